//! The predictions document consumed by the bloom map front end.

use bloom_core::daily_point::{iso_date, DailyPoint};
use bloom_core::site::ClimateInput;
use bloom_core::{BloomError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Climate inputs echoed back into a site's record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputFeatures {
    #[serde(rename = "winterPrecipitation_mm")]
    pub winter_precipitation_mm: f64,
    #[serde(rename = "winterAvgTemperature_C")]
    pub winter_avg_temperature_c: f64,
}

impl From<&ClimateInput> for InputFeatures {
    fn from(input: &ClimateInput) -> Self {
        InputFeatures {
            winter_precipitation_mm: input.precipitation_mm,
            winter_avg_temperature_c: input.avg_temp_c,
        }
    }
}

/// Everything predicted for one site in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePredictionRecord {
    #[serde(with = "iso_date")]
    pub predicted_peak_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub predicted_start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub predicted_end_date: NaiveDate,
    pub prediction_confidence: f64,
    pub prediction_method: String,
    pub model_accuracy: f64,
    #[serde(rename = "predictedPeakNDVI")]
    pub predicted_peak_ndvi: f64,
    pub input_features: InputFeatures,
    /// Off-season days followed by the bloom season, in date order
    pub ndvi_data: Vec<DailyPoint>,
}

impl SitePredictionRecord {
    /// Days belonging to the predicted bloom season.
    pub fn bloom_points(&self) -> impl Iterator<Item = &DailyPoint> {
        self.ndvi_data.iter().filter(|p| p.predicted)
    }

    /// Days belonging to the off-season lead-in.
    pub fn off_season_points(&self) -> impl Iterator<Item = &DailyPoint> {
        self.ndvi_data.iter().filter(|p| p.off_season)
    }

    pub fn point_on(&self, date: &NaiveDate) -> Option<&DailyPoint> {
        self.ndvi_data.iter().find(|p| p.date == *date)
    }
}

/// Site id to prediction record, written in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionDocument(pub BTreeMap<String, SitePredictionRecord>);

impl PredictionDocument {
    pub fn insert(&mut self, site_id: &str, record: SitePredictionRecord) {
        self.0.insert(site_id.to_string(), record);
    }

    pub fn get(&self, site_id: &str) -> Option<&SitePredictionRecord> {
        self.0.get(site_id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the document, replacing any previous file at `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let persistence = |reason: String| BloomError::Persistence {
            path: path.display().to_string(),
            reason,
        };
        let json = self.to_json().map_err(|e| persistence(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| persistence(e.to_string()))?;
        }
        std::fs::write(path, json).map_err(|e| persistence(e.to_string()))
    }

    /// Read a previously written document.
    pub fn read(path: &Path) -> Result<PredictionDocument> {
        let load = |reason: String| BloomError::DataLoad {
            path: path.display().to_string(),
            reason,
        };
        let json = std::fs::read_to_string(path).map_err(|e| load(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| load(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SitePredictionRecord {
        let peak = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        SitePredictionRecord {
            predicted_peak_date: peak,
            predicted_start_date: peak,
            predicted_end_date: NaiveDate::from_ymd_opt(2026, 3, 23).unwrap(),
            prediction_confidence: 0.75,
            prediction_method: String::from("Random Forest regression + synthetic bloom curve"),
            model_accuracy: 0.82,
            predicted_peak_ndvi: 0.65,
            input_features: InputFeatures {
                winter_precipitation_mm: 145.2,
                winter_avg_temperature_c: 17.8,
            },
            ndvi_data: vec![
                DailyPoint::off_season(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(), 0.16),
                DailyPoint::bloom(peak, 0.65, 0.75),
            ],
        }
    }

    #[test]
    fn test_record_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        for key in [
            "predictedPeakDate",
            "predictedStartDate",
            "predictedEndDate",
            "predictionConfidence",
            "predictionMethod",
            "modelAccuracy",
            "predictedPeakNDVI",
            "inputFeatures",
            "ndviData",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(obj["predictedPeakDate"], "2026-03-12");
        assert_eq!(obj["inputFeatures"]["winterPrecipitation_mm"], 145.2);
        assert_eq!(obj["inputFeatures"]["winterAvgTemperature_C"], 17.8);
        assert_eq!(obj["ndviData"][0]["offSeason"], true);
        assert!(obj["ndviData"][0].get("confidence").is_none());
        assert!(obj["ndviData"][1].get("offSeason").is_none());
    }

    #[test]
    fn test_record_splits_seasons() {
        let r = record();
        assert_eq!(r.bloom_points().count(), 1);
        assert_eq!(r.off_season_points().count(), 1);
        assert!(r.point_on(&r.predicted_peak_date).is_some());
    }

    #[test]
    fn test_document_orders_sites() {
        let mut doc = PredictionDocument::default();
        doc.insert("carrizo-plain", record());
        doc.insert("anza-borrego", record());
        let json = doc.to_json().unwrap();
        let anza = json.find("anza-borrego").unwrap();
        let carrizo = json.find("carrizo-plain").unwrap();
        assert!(anza < carrizo);
        assert!(json.starts_with("{\n  \"anza-borrego\": {\n    \"predictedPeakDate\""));
    }

    #[test]
    fn test_read_missing_document() {
        let err = PredictionDocument::read(Path::new("no/such/predictions.json")).unwrap_err();
        assert!(matches!(err, BloomError::DataLoad { .. }));
    }
}
