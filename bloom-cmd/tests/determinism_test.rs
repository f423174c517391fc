//! Running the prediction pipeline twice with the same seed must write
//! byte-for-byte identical documents.

use bloom_cmd::predict::{run_predictions, RunConfig, SeasonYears};
use bloom_cmd::record::PredictionDocument;
use bloom_data::curve::CurveParams;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn workspace_sites() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures/sites.csv")
}

fn config(sites_csv: PathBuf, output: PathBuf, seed: Option<u64>) -> RunConfig {
    RunConfig {
        sites_csv,
        output,
        years: SeasonYears::default(),
        seed,
        curve: CurveParams::default(),
    }
}

#[test]
fn test_run_predictions_determinism() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("run1/predictions.json");
    let second = dir.path().join("run2/predictions.json");

    run_predictions(&config(workspace_sites(), first.clone(), Some(42))).unwrap();
    run_predictions(&config(workspace_sites(), second.clone(), Some(42))).unwrap();

    let a = fs::read(&first).unwrap();
    let b = fs::read(&second).unwrap();
    assert_eq!(a, b, "same seed produced different documents");
    assert!(!a.ends_with(b"\n"));
}

#[test]
fn test_run_predictions_document_shape() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("predictions2025_2026.json");
    run_predictions(&config(workspace_sites(), output.clone(), Some(7))).unwrap();

    let document = PredictionDocument::read(&output).unwrap();
    let ids: Vec<&str> = document.0.keys().map(String::as_str).collect();
    // death-valley is disabled in the registry
    assert_eq!(ids, vec!["anza-borrego", "carrizo-plain"]);

    for record in document.0.values() {
        assert_eq!(record.ndvi_data.len(), 242);
        assert_eq!(record.off_season_points().count(), 92);
        assert_eq!(record.bloom_points().count(), 150);
        assert!(record.predicted_start_date <= record.predicted_peak_date);
        assert!(record.predicted_peak_date <= record.predicted_end_date);
        for pair in record.ndvi_data.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for point in &record.ndvi_data {
            assert!((0.10..=0.85).contains(&point.ndvi));
        }
    }

    let carrizo = document.get("carrizo-plain").unwrap();
    assert_eq!(carrizo.input_features.winter_precipitation_mm, 156.8);
    assert_eq!(carrizo.input_features.winter_avg_temperature_c, 16.5);
}

#[test]
fn test_missing_history_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let sites = dir.path().join("sites.csv");
    fs::write(
        &sites,
        "ID,NAME,LATITUDE,LONGITUDE,HISTORY_CSV,MODEL,WINTER_PRECIP_MM,WINTER_AVG_TEMP_C,NO_BLOOM,EMERGING,BLOOMING,PEAK_BLOOM,ENABLED\n\
         nowhere,Nowhere,0,0,missing.csv,missing.json,100,15,0.1,0.2,0.3,0.4,true\n",
    )
    .unwrap();
    let output = dir.path().join("out.json");

    let err = run_predictions(&config(sites, output.clone(), Some(1))).unwrap_err();
    assert!(format!("{err:#}").contains("nowhere"));
    assert!(!output.exists());
}
