use bloom_core::site::BloomThresholds;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Visual bloom stage of an NDVI reading at a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BloomStage {
    /// June through January: no bloom is shown regardless of NDVI
    OutOfSeason,
    Dormant,
    Emerging,
    Blooming,
    NearPeak,
    PeakBloom,
}

impl fmt::Display for BloomStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloomStage::OutOfSeason => "Out of season",
            BloomStage::Dormant => "Dormant",
            BloomStage::Emerging => "Emerging",
            BloomStage::Blooming => "Blooming",
            BloomStage::NearPeak => "Near peak",
            BloomStage::PeakBloom => "Peak bloom",
        };
        write!(f, "{label}")
    }
}

/// Whether blooms can be shown for `date` at all (February through May).
pub fn in_bloom_months(date: &NaiveDate) -> bool {
    (2..=5).contains(&date.month())
}

/// Classify an NDVI reading against a site's thresholds.
pub fn classify_stage(ndvi: f64, date: &NaiveDate, thresholds: &BloomThresholds) -> BloomStage {
    if !in_bloom_months(date) {
        BloomStage::OutOfSeason
    } else if ndvi < thresholds.no_bloom {
        BloomStage::Dormant
    } else if ndvi < thresholds.emerging {
        BloomStage::Emerging
    } else if ndvi < thresholds.blooming {
        BloomStage::Blooming
    } else if ndvi < thresholds.peak_bloom {
        BloomStage::NearPeak
    } else {
        BloomStage::PeakBloom
    }
}
