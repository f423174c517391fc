use bloom_core::observation::{ObservationPoint, ReferencePeak};
use bloom_core::{BloomError, Result};
use chrono::Datelike;
use std::ops::RangeInclusive;

/// Months searched first for the historical peak (February through April).
pub const SPRING_MONTHS: RangeInclusive<u32> = 2..=4;

/// Find the historical peak used to anchor a synthetic season.
///
/// Searches points inside [`SPRING_MONTHS`] and falls back to the whole
/// series when none fall in spring. Ties keep the earliest point in series
/// order.
pub fn find_reference_peak(points: &[ObservationPoint]) -> Result<ReferencePeak> {
    let spring = max_by_ndvi(
        points
            .iter()
            .filter(|p| SPRING_MONTHS.contains(&p.date.month())),
    );
    spring
        .or_else(|| max_by_ndvi(points.iter()))
        .map(|p| ReferencePeak::from(*p))
        .ok_or(BloomError::EmptySeries)
}

fn max_by_ndvi<'a, I>(points: I) -> Option<&'a ObservationPoint>
where
    I: Iterator<Item = &'a ObservationPoint>,
{
    points.fold(None, |best, p| match best {
        Some(b) if b.ndvi >= p.ndvi => Some(b),
        _ => Some(p),
    })
}
