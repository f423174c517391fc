//! Read back a predictions document and report on it.

use crate::record::{PredictionDocument, SitePredictionRecord};
use anyhow::Context;
use bloom_core::site::{BloomThresholds, Site};
use bloom_data::stage::{classify_stage, BloomStage};
use bloom_utils::dates::{format_date, parse_date};
use chrono::NaiveDate;
use log::{info, warn};
use std::path::Path;

/// What the predictions say about one day at a site.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub ndvi: Option<f64>,
    pub predicted: bool,
    pub in_bloom_window: bool,
    pub stage: Option<BloomStage>,
}

/// Headline numbers of one site's predicted season.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub site_id: String,
    pub peak_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub peak_ndvi: f64,
    pub bloom_days: usize,
    pub off_season_days: usize,
    /// Days from the first blooming day to the peak
    pub advance_warning_days: i64,
    pub day: Option<DayReport>,
}

/// Summarize a site's record, optionally inspecting a single date.
pub fn summarize(
    site_id: &str,
    record: &SitePredictionRecord,
    thresholds: Option<&BloomThresholds>,
    date: Option<NaiveDate>,
) -> SiteSummary {
    let day = date.map(|date| {
        let point = record.point_on(&date);
        DayReport {
            date,
            ndvi: point.map(|p| p.ndvi),
            predicted: point.is_some_and(|p| p.predicted),
            in_bloom_window: record.predicted_start_date <= date
                && date <= record.predicted_end_date,
            stage: match (point, thresholds) {
                (Some(p), Some(t)) => Some(classify_stage(p.ndvi, &date, t)),
                _ => None,
            },
        }
    });
    SiteSummary {
        site_id: site_id.to_string(),
        peak_date: record.predicted_peak_date,
        start_date: record.predicted_start_date,
        end_date: record.predicted_end_date,
        peak_ndvi: record.predicted_peak_ndvi,
        bloom_days: record.bloom_points().count(),
        off_season_days: record.off_season_points().count(),
        advance_warning_days: (record.predicted_peak_date - record.predicted_start_date).num_days(),
        day,
    }
}

/// Log a summary of every site (or just `site`) in a predictions document.
pub fn run_summary(
    predictions: &str,
    sites_csv: &str,
    site: Option<&str>,
    date: Option<&str>,
) -> anyhow::Result<()> {
    let document = PredictionDocument::read(Path::new(predictions))?;
    let date = date
        .map(|s| parse_date(s).with_context(|| format!("invalid --date {s:?}, expected YYYY-MM-DD")))
        .transpose()?;

    let sites = match Site::from_path(Path::new(sites_csv)) {
        Ok(sites) => sites,
        Err(e) => {
            warn!("Bloom stages unavailable: {}", e);
            Vec::new()
        }
    };

    let selected: Vec<(&str, &SitePredictionRecord)> = match site {
        Some(id) => {
            let record = document
                .get(id)
                .with_context(|| format!("no predictions for site {id:?} in {predictions}"))?;
            vec![(id, record)]
        }
        None => document
            .0
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect(),
    };

    for (site_id, record) in selected {
        let thresholds = sites
            .iter()
            .find(|s| s.id == site_id)
            .map(|s| &s.thresholds);
        let summary = summarize(site_id, record, thresholds, date);
        info!("{}:", summary.site_id);
        info!("  Peak NDVI: {:.3}", summary.peak_ndvi);
        info!(
            "  Peak date: {} (bloom {} to {}, {} days of warning)",
            format_date(&summary.peak_date),
            format_date(&summary.start_date),
            format_date(&summary.end_date),
            summary.advance_warning_days
        );
        info!(
            "  {} bloom-season days, {} off-season days",
            summary.bloom_days, summary.off_season_days
        );
        if let Some(day) = summary.day {
            match day.ndvi {
                Some(ndvi) => info!(
                    "  {}: NDVI {:.2}, {}, {}{}",
                    format_date(&day.date),
                    ndvi,
                    if day.predicted { "predicted" } else { "off-season" },
                    if day.in_bloom_window { "inside bloom window" } else { "outside bloom window" },
                    day.stage.map(|s| format!(", stage: {s}")).unwrap_or_default()
                ),
                None => info!("  {}: no data", format_date(&day.date)),
            }
        }
    }
    Ok(())
}
