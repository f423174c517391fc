use bloom_core::daily_point::DailyPoint;
use bloom_core::date_range::DateRange;
use bloom_core::{BloomError, Result};
use bloom_utils::numeric::round_to;
use chrono::NaiveDate;
use rand::Rng;

/// Dormant-season NDVI baseline.
pub const OFF_SEASON_BASELINE: f64 = 0.15;

/// Half-width of the uniform wobble around the baseline.
pub const OFF_SEASON_SPREAD: f64 = 0.03;

/// October 1 through December 31 of `year`, the dormant window shown before a
/// bloom season.
pub fn off_season_range(year: i32) -> Result<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, 10, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange(start, end)),
        _ => Err(BloomError::DateParse(format!("no off-season window for year {year}"))),
    }
}

/// Generate the flat off-season series for `year` (always 92 days).
pub fn generate_off_season<R: Rng + ?Sized>(year: i32, rng: &mut R) -> Result<Vec<DailyPoint>> {
    let points = off_season_range(year)?
        .map(|date| {
            let wobble = rng.gen_range(-OFF_SEASON_SPREAD..OFF_SEASON_SPREAD);
            DailyPoint::off_season(date, round_to(OFF_SEASON_BASELINE + wobble, 2))
        })
        .collect();
    Ok(points)
}
