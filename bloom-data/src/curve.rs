use bloom_core::daily_point::DailyPoint;
use bloom_core::date_range::DateRange;
use bloom_core::{BloomError, Result};
use bloom_utils::dates::transplant;
use bloom_utils::numeric::round_to;
use chrono::{NaiveDate, TimeDelta};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Length of a synthesized bloom season in days.
pub const BLOOM_SEASON_DAYS: i64 = 150;

/// Days of the season that precede the peak.
pub const DAYS_BEFORE_PEAK: i64 = 60;

/// Confidence attached to every synthesized bloom point.
pub const PREDICTION_CONFIDENCE: f64 = 0.75;

/// Shape and noise settings of the bloom curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// Dormant NDVI the curve rises from and decays back to
    pub floor: f64,
    /// Logistic scale of the green-up, in days
    pub rise_days: f64,
    /// Exponential time constant of senescence, in days
    pub decay_days: f64,
    /// Peak date shifts uniformly within +/- this many days
    pub max_jitter_days: i64,
    /// Standard deviation of the per-day Gaussian noise
    pub noise_std_dev: f64,
    pub min_ndvi: f64,
    pub max_ndvi: f64,
    pub confidence: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        CurveParams {
            floor: 0.15,
            rise_days: 15.0,
            decay_days: 25.0,
            max_jitter_days: 5,
            noise_std_dev: 0.01,
            min_ndvi: 0.10,
            max_ndvi: 0.85,
            confidence: PREDICTION_CONFIDENCE,
        }
    }
}

impl CurveParams {
    /// Noise-free NDVI `days_from_peak` days away from the peak.
    ///
    /// Before the peak the curve follows a logistic green-up that reaches half
    /// of the rise as it approaches the peak; from the peak onward it decays
    /// exponentially.
    pub fn shape(&self, peak_value: f64, days_from_peak: i64) -> f64 {
        let d = days_from_peak as f64;
        let amplitude = peak_value - self.floor;
        if days_from_peak < 0 {
            self.floor + amplitude * sigmoid(d / self.rise_days)
        } else {
            self.floor + amplitude * (-d / self.decay_days).exp()
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A synthesized bloom season and the peak date it was built around.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomSeason {
    pub points: Vec<DailyPoint>,
    pub peak_date: NaiveDate,
}

/// Spread a predicted peak NDVI over a 150-day bloom season.
///
/// The peak date is the reference month/day placed on `target_year`, shifted
/// by a uniform integer jitter. Both the jitter and the per-day noise come
/// from `rng`, so a seeded generator reproduces the season exactly.
pub fn synthesize<R: Rng + ?Sized>(
    peak_value: f64,
    reference: &NaiveDate,
    target_year: i32,
    params: &CurveParams,
    rng: &mut R,
) -> Result<BloomSeason> {
    let anchor = transplant(reference, target_year).ok_or_else(|| {
        BloomError::DateParse(format!("{reference} cannot be placed on year {target_year}"))
    })?;
    let jitter = rng.gen_range(-params.max_jitter_days..=params.max_jitter_days);
    let out_of_calendar =
        || BloomError::DateParse(format!("bloom season around {anchor} leaves the calendar"));
    let peak_date = anchor
        .checked_add_signed(TimeDelta::days(jitter))
        .ok_or_else(out_of_calendar)?;
    let noise = Normal::new(0.0, params.noise_std_dev)
        .map_err(|e| BloomError::SiteConfig(format!("invalid curve noise: {e}")))?;

    let start = peak_date
        .checked_sub_signed(TimeDelta::days(DAYS_BEFORE_PEAK))
        .ok_or_else(out_of_calendar)?;
    let points = DateRange::from_start(start, BLOOM_SEASON_DAYS)
        .ok_or_else(out_of_calendar)?
        .map(|date| {
            let days_from_peak = (date - peak_date).num_days();
            let ndvi = params.shape(peak_value, days_from_peak) + noise.sample(&mut *rng);
            let ndvi = round_to(ndvi.clamp(params.min_ndvi, params.max_ndvi), 2);
            DailyPoint::bloom(date, ndvi, params.confidence)
        })
        .collect();

    Ok(BloomSeason { points, peak_date })
}
