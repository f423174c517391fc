pub mod columns;
pub mod daily_point;
pub mod date_range;
pub mod error;
pub mod observation;
pub mod site;

pub use error::{BloomError, Result};
