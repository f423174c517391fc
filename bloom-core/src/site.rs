use crate::error::{BloomError, Result};
use csv::{ReaderBuilder, StringRecord};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Winter climate conditions fed to a site's peak predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateInput {
    /// Total winter precipitation in millimetres
    pub precipitation_mm: f64,
    /// Mean winter air temperature in degrees Celsius
    pub avg_temp_c: f64,
}

/// NDVI cut-offs separating the bloom stages of one site, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloomThresholds {
    pub no_bloom: f64,
    pub emerging: f64,
    pub blooming: f64,
    pub peak_bloom: f64,
}

impl BloomThresholds {
    fn is_ascending(&self) -> bool {
        self.no_bloom <= self.emerging
            && self.emerging <= self.blooming
            && self.blooming <= self.peak_bloom
    }
}

/// A superbloom site with the inputs needed to predict its season.
///
/// See the `fixtures/sites.csv` registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Identifier used as the key of the predictions document (e.g. "anza-borrego")
    pub id: String,
    /// Human-readable name of the site
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Historical NDVI export for the site
    pub history_csv: PathBuf,
    /// Serialized peak-NDVI model artifact
    pub model: PathBuf,
    pub climate: ClimateInput,
    pub thresholds: BloomThresholds,
}

impl Site {
    /// Parse the site registry CSV, keeping only enabled sites.
    ///
    /// Expected columns (with headers):
    /// `ID,NAME,LATITUDE,LONGITUDE,HISTORY_CSV,MODEL,WINTER_PRECIP_MM,WINTER_AVG_TEMP_C,NO_BLOOM,EMERGING,BLOOMING,PEAK_BLOOM,ENABLED`
    ///
    /// Relative paths are resolved against `base_dir`. Disabled rows only need
    /// an `ID`, `NAME` and `ENABLED` value. Site ids must be unique across all
    /// rows, disabled ones included.
    pub fn parse_site_csv(csv_object: &str, base_dir: &Path) -> Result<Vec<Site>> {
        let mut site_list: Vec<Site> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let id = text_field(&record, 0, "ID")?;
            if !seen_ids.insert(id.clone()) {
                return Err(BloomError::SiteConfig(format!("{id}: duplicate site id")));
            }
            let enabled = record.get(12).map(str::trim).unwrap_or("true");
            if enabled.eq_ignore_ascii_case("false") || enabled == "0" {
                info!("Skipping disabled site {}", id);
                continue;
            }
            let thresholds = BloomThresholds {
                no_bloom: number_field(&record, 8, "NO_BLOOM")?,
                emerging: number_field(&record, 9, "EMERGING")?,
                blooming: number_field(&record, 10, "BLOOMING")?,
                peak_bloom: number_field(&record, 11, "PEAK_BLOOM")?,
            };
            if !thresholds.is_ascending() {
                return Err(BloomError::SiteConfig(format!(
                    "{id}: bloom thresholds must be ascending"
                )));
            }
            let site = Site {
                name: text_field(&record, 1, "NAME")?,
                latitude: number_field(&record, 2, "LATITUDE")?,
                longitude: number_field(&record, 3, "LONGITUDE")?,
                history_csv: base_dir.join(text_field(&record, 4, "HISTORY_CSV")?),
                model: base_dir.join(text_field(&record, 5, "MODEL")?),
                climate: ClimateInput {
                    precipitation_mm: number_field(&record, 6, "WINTER_PRECIP_MM")?,
                    avg_temp_c: number_field(&record, 7, "WINTER_AVG_TEMP_C")?,
                },
                thresholds,
                id,
            };
            site_list.push(site);
        }
        Ok(site_list)
    }

    /// Read the site registry from disk, resolving paths beside it.
    pub fn from_path(path: &Path) -> Result<Vec<Site>> {
        let csv_object = std::fs::read_to_string(path).map_err(|e| {
            BloomError::SiteConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Site::parse_site_csv(&csv_object, base_dir)
    }
}

fn text_field(record: &StringRecord, idx: usize, name: &str) -> Result<String> {
    match record.get(idx).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(BloomError::SiteConfig(format!("missing {name} on line {}", line_of(record)))),
    }
}

fn number_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64> {
    let raw = text_field(record, idx, name)?;
    raw.parse::<f64>().map_err(|_| {
        BloomError::SiteConfig(format!(
            "{name} is not a number ({raw:?}) on line {}",
            line_of(record)
        ))
    })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}
