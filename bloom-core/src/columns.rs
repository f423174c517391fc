use crate::error::{BloomError, Result};

/// Header substrings that identify the date column.
pub const DATE_COLUMN_HINTS: [&str; 1] = ["date"];

/// Header substrings that identify the NDVI column. A header matches when
/// it contains any hint; the first matching header wins.
pub const NDVI_COLUMN_HINTS: [&str; 3] = ["ndvi", "index", "value"];

/// How the date and NDVI columns were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Both columns matched a header hint.
    Matched,
    /// At least one hint failed; columns 0 and 1 are used instead.
    Positional,
}

/// Resolved column indices for a historical NDVI export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub date: usize,
    pub ndvi: usize,
    pub source: ColumnSource,
}

impl ColumnSelection {
    /// Pick the date and NDVI columns from a header row.
    ///
    /// Matching is case-insensitive substring search. If either column cannot
    /// be matched, both fall back to the first two columns.
    pub fn detect<'a, I>(headers: I) -> Result<ColumnSelection>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lowered: Vec<String> = headers.into_iter().map(str::to_lowercase).collect();
        if lowered.len() < 2 {
            return Err(BloomError::TooFewColumns {
                found: lowered.len(),
            });
        }
        let date = first_match(&lowered, &DATE_COLUMN_HINTS);
        let ndvi = first_match(&lowered, &NDVI_COLUMN_HINTS);
        Ok(match (date, ndvi) {
            (Some(date), Some(ndvi)) => ColumnSelection {
                date,
                ndvi,
                source: ColumnSource::Matched,
            },
            _ => ColumnSelection {
                date: 0,
                ndvi: 1,
                source: ColumnSource::Positional,
            },
        })
    }
}

fn first_match(headers: &[String], hints: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| hints.iter().any(|hint| h.contains(hint)))
}
