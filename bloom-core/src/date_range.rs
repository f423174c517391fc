use chrono::{NaiveDate, TimeDelta};

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Range of `len` consecutive days beginning at `start`, or `None` when
    /// the last day falls outside the representable calendar.
    pub fn from_start(start: NaiveDate, len: i64) -> Option<DateRange> {
        start
            .checked_add_signed(TimeDelta::days(len - 1))
            .map(|end| DateRange(start, end))
    }

    /// Days in the range, or zero when the end precedes the start.
    pub fn num_days(&self) -> i64 {
        ((self.1 - self.0).num_days() + 1).max(0)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.succ_opt() {
            Some(next) => self.0 = next,
            // last representable day: close the range
            None => self.1 = NaiveDate::MIN,
        }
        Some(current)
    }
}
