//! Peak NDVI predictors.
//!
//! The orchestrator only sees the [`Predictor`] trait. Concrete models are
//! loaded from JSON artifacts exported after training (see [`artifact`]),
//! so any regression family that can be written as a linear model or a
//! forest of regression trees plugs in without code changes.

pub mod artifact;
pub mod predictor;

pub use artifact::ModelArtifact;
pub use predictor::{FeatureRow, Predictor};
