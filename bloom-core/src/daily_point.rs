//! Daily NDVI points as written to the predictions document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of a synthetic NDVI series.
///
/// Bloom-season points carry `predicted: true` and a confidence; off-season
/// points carry `offSeason: true` and no confidence. Absent fields are left
/// out of the JSON entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub ndvi: f64,
    pub predicted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub off_season: bool,
}

impl DailyPoint {
    pub fn bloom(date: NaiveDate, ndvi: f64, confidence: f64) -> DailyPoint {
        DailyPoint {
            date,
            ndvi,
            predicted: true,
            confidence: Some(confidence),
            off_season: false,
        }
    }

    pub fn off_season(date: NaiveDate, ndvi: f64) -> DailyPoint {
        DailyPoint {
            date,
            ndvi,
            predicted: false,
            confidence: None,
            off_season: true,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Serde adapter writing dates as "YYYY-MM-DD".
pub mod iso_date {
    use bloom_utils::dates::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_date(&s).ok_or_else(|| D::Error::custom(format!("invalid date {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::DailyPoint;
    use chrono::NaiveDate;

    #[test]
    fn test_bloom_point_json() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let json = serde_json::to_string(&DailyPoint::bloom(date, 0.62, 0.75)).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2026-03-15","ndvi":0.62,"predicted":true,"confidence":0.75}"#
        );
    }

    #[test]
    fn test_off_season_point_json() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let json = serde_json::to_string(&DailyPoint::off_season(date, 0.14)).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2025-10-01","ndvi":0.14,"predicted":false,"offSeason":true}"#
        );
        let back: DailyPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DailyPoint::off_season(date, 0.14));
    }
}
