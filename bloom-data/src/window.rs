use bloom_core::daily_point::DailyPoint;
use chrono::NaiveDate;

/// NDVI at or above which a synthesized day counts as blooming.
pub const BLOOM_THRESHOLD: f64 = 0.5;

/// First and last blooming days of a synthesized season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// No day reached the threshold; both ends sit on the peak date.
    pub degenerate: bool,
}

impl BloomWindow {
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

/// Derive the bloom window of a date-ordered bloom season.
///
/// Off-season points are ignored. When no point reaches `threshold` the
/// window collapses onto `peak_date`.
pub fn extract_window(points: &[DailyPoint], peak_date: NaiveDate, threshold: f64) -> BloomWindow {
    let mut blooming = points
        .iter()
        .filter(|p| !p.off_season && p.ndvi >= threshold);
    match blooming.next() {
        Some(first) => {
            let last = blooming.last().unwrap_or(first);
            BloomWindow {
                start: first.date,
                end: last.date,
                degenerate: false,
            }
        }
        None => BloomWindow {
            start: peak_date,
            end: peak_date,
            degenerate: true,
        },
    }
}
