//! Command implementations for the bloom CLI.
//!
//! Provides subcommands for generating the bloom-season predictions
//! document and for summarizing one that was already written.

use bloom_data::curve::CurveParams;
use clap::Subcommand;
use std::path::PathBuf;

pub mod predict;
pub mod record;
pub mod summary;

pub const DEFAULT_SITES_CSV: &str = "fixtures/sites.csv";
pub const DEFAULT_OUTPUT: &str = "data/predictions2025_2026.json";

#[derive(Subcommand)]
pub enum Command {
    /// Predict the coming bloom season for every enabled site
    Run {
        /// Site registry CSV; history and model paths resolve relative to it
        #[arg(short = 's', long = "sites", default_value = DEFAULT_SITES_CSV)]
        sites_csv: String,

        /// Output path for the predictions JSON (replaced if present)
        #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
        output: String,

        /// Calendar year of the predicted bloom season
        #[arg(long, default_value_t = predict::TARGET_YEAR)]
        target_year: i32,

        /// Year whose October-December becomes the off-season lead-in
        #[arg(long, default_value_t = predict::OFF_SEASON_YEAR)]
        off_season_year: i32,

        /// Seed the random jitter and noise for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize a previously written predictions document
    Summary {
        /// Predictions JSON written by `run`
        #[arg(short = 'p', long, default_value = DEFAULT_OUTPUT)]
        predictions: String,

        /// Site registry CSV, used for bloom stage thresholds
        #[arg(short = 's', long = "sites", default_value = DEFAULT_SITES_CSV)]
        sites_csv: String,

        /// Only report this site id
        #[arg(long)]
        site: Option<String>,

        /// Also report NDVI and bloom stage on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Run {
            sites_csv,
            output,
            target_year,
            off_season_year,
            seed,
        } => {
            let config = predict::RunConfig {
                sites_csv: PathBuf::from(sites_csv),
                output: PathBuf::from(output),
                years: predict::SeasonYears {
                    target: target_year,
                    off_season: off_season_year,
                },
                seed,
                curve: CurveParams::default(),
            };
            predict::run_predictions(&config)
        }
        Command::Summary {
            predictions,
            sites_csv,
            site,
            date,
        } => summary::run_summary(&predictions, &sites_csv, site.as_deref(), date.as_deref()),
    }
}
