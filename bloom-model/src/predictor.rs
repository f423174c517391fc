use bloom_core::site::ClimateInput;
use bloom_core::{BloomError, Result};
use serde::Serialize;

/// Input column names the models were trained with.
pub const PRECIP_FEATURE: &str = "winter_precip_mm";
pub const TEMP_FEATURE: &str = "winter_avg_temp_C";

/// One row of model input, keyed by training column name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub winter_precip_mm: f64,
    #[serde(rename = "winter_avg_temp_C")]
    pub winter_avg_temp_c: f64,
}

impl FeatureRow {
    /// Look up a feature by its training column name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            PRECIP_FEATURE => Some(self.winter_precip_mm),
            TEMP_FEATURE => Some(self.winter_avg_temp_c),
            _ => None,
        }
    }

    pub fn is_known(name: &str) -> bool {
        matches!(name, PRECIP_FEATURE | TEMP_FEATURE)
    }
}

impl From<&ClimateInput> for FeatureRow {
    fn from(input: &ClimateInput) -> Self {
        FeatureRow {
            winter_precip_mm: input.precipitation_mm,
            winter_avg_temp_c: input.avg_temp_c,
        }
    }
}

/// A trained model mapping winter climate to a season's peak NDVI.
pub trait Predictor {
    /// Predict one value per input row.
    fn predict(&self, rows: &[FeatureRow]) -> Vec<f64>;

    /// Predict the peak NDVI for a single site's climate.
    ///
    /// Anything other than exactly one finite value is a
    /// [`BloomError::MissingModelOutput`].
    fn predict_peak(&self, input: &ClimateInput) -> Result<f64> {
        let output = self.predict(&[FeatureRow::from(input)]);
        match output.as_slice() {
            [value] if value.is_finite() => Ok(*value),
            _ => Err(BloomError::MissingModelOutput {
                returned: output.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl Predictor for Fixed {
        fn predict(&self, _rows: &[FeatureRow]) -> Vec<f64> {
            self.0.clone()
        }
    }

    const CLIMATE: ClimateInput = ClimateInput {
        precipitation_mm: 145.2,
        avg_temp_c: 17.8,
    };

    #[test]
    fn test_predict_peak_single_value() {
        assert_eq!(Fixed(vec![0.65]).predict_peak(&CLIMATE).unwrap(), 0.65);
    }

    #[test]
    fn test_predict_peak_wrong_arity() {
        for output in [vec![], vec![0.4, 0.5]] {
            let n = output.len();
            let err = Fixed(output).predict_peak(&CLIMATE).unwrap_err();
            assert!(matches!(err, BloomError::MissingModelOutput { returned } if returned == n));
        }
    }

    #[test]
    fn test_predict_peak_rejects_nan() {
        let err = Fixed(vec![f64::NAN]).predict_peak(&CLIMATE).unwrap_err();
        assert!(matches!(err, BloomError::MissingModelOutput { returned: 1 }));
    }

    #[test]
    fn test_feature_row_names() {
        let row = FeatureRow::from(&CLIMATE);
        assert_eq!(row.get("winter_precip_mm"), Some(145.2));
        assert_eq!(row.get("winter_avg_temp_C"), Some(17.8));
        assert_eq!(row.get("winter_avg_temp_c"), None);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"winter_precip_mm":145.2,"winter_avg_temp_C":17.8}"#);
    }
}
