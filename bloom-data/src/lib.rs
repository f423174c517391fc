//! Synthetic bloom-season processing for NDVI series.
//!
//! This crate turns a historical NDVI series and a single predicted peak
//! value into the daily series plotted by the bloom charts:
//!
//! - [`peak`] locates the historical spring peak used as a phenology anchor
//! - [`curve`] spreads a predicted peak over a 150-day bloom season
//! - [`off_season`] fills the dormant October-December window
//! - [`window`] derives the bloom start/end dates from a synthesized season
//! - [`stage`] labels an NDVI reading with a site's bloom stage

pub mod curve;
pub mod off_season;
pub mod peak;
pub mod stage;
pub mod window;

#[cfg(test)]
pub(crate) mod test_rng {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}
