/// Error types for the bloom prediction libraries
use thiserror::Error;

/// Main error type for bloom prediction operations
#[derive(Error, Debug)]
pub enum BloomError {
    /// Historical NDVI source missing or unreadable
    #[error("Failed to load historical data from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Tabular source cannot supply a date and an NDVI column
    #[error("Historical source has {found} column(s), at least 2 are required")]
    TooFewColumns { found: usize },

    /// Point-prediction model missing or malformed
    #[error("Failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    /// No observation to take a peak from
    #[error("Historical series is empty, no peak can be found")]
    EmptySeries,

    /// A single-row query did not yield exactly one usable value
    #[error("Model returned {returned} value(s) for a single-row query, expected exactly 1 finite value")]
    MissingModelOutput { returned: usize },

    /// Output document could not be written
    #[error("Failed to write predictions to {path}: {reason}")]
    Persistence { path: String, reason: String },

    /// Invalid site registry entry
    #[error("Invalid site configuration: {0}")]
    SiteConfig(String),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

/// Type alias for Results using BloomError
pub type Result<T> = std::result::Result<T, BloomError>;
