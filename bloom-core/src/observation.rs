use crate::columns::{ColumnSelection, ColumnSource};
use crate::error::{BloomError, Result};
use bloom_utils::dates::parse_flexible_date;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single historical NDVI reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub ndvi: f64,
}

/// The historical observation used to anchor a synthetic season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePeak {
    pub date: NaiveDate,
    pub ndvi: f64,
}

impl From<ObservationPoint> for ReferencePeak {
    fn from(point: ObservationPoint) -> Self {
        ReferencePeak {
            date: point.date,
            ndvi: point.ndvi,
        }
    }
}

/// A date-ordered NDVI series read from a historical export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    pub points: Vec<ObservationPoint>,
    pub columns: Option<ColumnSelection>,
}

impl HistoricalSeries {
    pub fn new(mut points: Vec<ObservationPoint>) -> HistoricalSeries {
        points.sort_by_key(|p| p.date);
        HistoricalSeries {
            points,
            columns: None,
        }
    }

    /// Read a historical export from disk.
    pub fn from_path(path: &Path) -> Result<HistoricalSeries> {
        let display = path.display().to_string();
        let csv_data = std::fs::read_to_string(path).map_err(|e| BloomError::DataLoad {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        info!("Loaded historical data: {}", display);
        HistoricalSeries::parse_csv(&csv_data).map_err(|e| match e {
            BloomError::DataLoad { reason, .. } => BloomError::DataLoad {
                path: display,
                reason,
            },
            other => other,
        })
    }

    /// Parse a historical export from a CSV string.
    ///
    /// The header row decides which columns hold the date and NDVI values
    /// (see [`ColumnSelection::detect`]). Rows whose NDVI cell is not numeric
    /// are skipped; a date that cannot be parsed is an error.
    ///
    /// # Example CSV
    /// ```text
    /// date,NDVI,EBI,cloud_cover
    /// 2017-03-10,0.31,0.12,4.5
    /// ```
    pub fn parse_csv(csv_data: &str) -> Result<HistoricalSeries> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = rdr.headers()?.clone();
        let columns = ColumnSelection::detect(headers.iter())?;
        let date_header = headers.get(columns.date).unwrap_or("");
        let ndvi_header = headers.get(columns.ndvi).unwrap_or("");
        match columns.source {
            ColumnSource::Matched => info!(
                "Detected columns: date={:?}, ndvi={:?}",
                date_header, ndvi_header
            ),
            ColumnSource::Positional => warn!(
                "Could not auto-detect columns, using first two as date,ndvi ({:?}, {:?})",
                date_header, ndvi_header
            ),
        }

        let mut points = Vec::new();
        let mut skipped = 0u32;
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let date_str = record.get(columns.date).unwrap_or("").trim();
            let ndvi_str = record.get(columns.ndvi).unwrap_or("").trim();

            let ndvi = match ndvi_str.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            let date = parse_flexible_date(date_str).ok_or_else(|| BloomError::DataLoad {
                path: String::from("<csv>"),
                reason: format!("unparseable date {:?} on data row {}", date_str, row + 1),
            })?;
            points.push(ObservationPoint { date, ndvi });
        }
        if skipped > 0 {
            warn!("Skipped {} rows with non-numeric NDVI", skipped);
        }

        let mut series = HistoricalSeries::new(points);
        series.columns = Some(columns);
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
