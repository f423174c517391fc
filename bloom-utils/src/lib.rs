//! Shared utility functions for bloom crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Date format used in the predictions document: "YYYY-MM-DD"
    pub const ISO_FORMAT: &str = "%Y-%m-%d";

    /// Date-only formats accepted from historical NDVI exports, tried in order.
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), ISO_FORMAT).ok()
    }

    /// Parse a date cell from a historical export.
    ///
    /// Accepts the date-only forms in [`DATE_FORMATS`], plus date-time strings
    /// whose leading part is one of them ("2019-03-10T00:00:00",
    /// "2019-03-10 00:00").
    pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
        let trimmed = s.trim();
        let date_part = trimmed
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or(trimmed);
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    }

    /// Place a historical month/day onto another year.
    ///
    /// Feb 29 lands on Feb 28 when `year` is not a leap year.
    pub fn transplant(reference: &NaiveDate, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, reference.month(), reference.day()).or_else(|| {
            if reference.month() == 2 && reference.day() == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2026-03-15");
            assert_eq!(parse_date(&formatted), Some(date));
        }

        #[test]
        fn test_parse_flexible_date_forms() {
            let expected = NaiveDate::from_ymd_opt(2019, 3, 10).unwrap();
            for s in [
                "2019-03-10",
                "2019/03/10",
                "03/10/2019",
                "20190310",
                "2019-03-10T00:00:00",
                "2019-03-10 12:30",
                " 2019-03-10 ",
            ] {
                assert_eq!(parse_flexible_date(s), Some(expected), "input {s:?}");
            }
            assert_eq!(parse_flexible_date("not a date"), None);
            assert_eq!(parse_flexible_date(""), None);
        }

        #[test]
        fn test_transplant() {
            let reference = NaiveDate::from_ymd_opt(2019, 3, 10).unwrap();
            assert_eq!(
                transplant(&reference, 2026),
                NaiveDate::from_ymd_opt(2026, 3, 10)
            );

            let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            assert_eq!(
                transplant(&leap_day, 2026),
                NaiveDate::from_ymd_opt(2026, 2, 28)
            );
            assert_eq!(
                transplant(&leap_day, 2028),
                NaiveDate::from_ymd_opt(2028, 2, 29)
            );
        }
    }
}

/// Numeric helpers
pub mod numeric {
    /// Round `value` to `decimals` places, half away from zero.
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    }

    #[cfg(test)]
    mod tests {
        use super::round_to;

        #[test]
        fn test_round_to() {
            assert_eq!(round_to(0.654321, 3), 0.654);
            assert_eq!(round_to(0.6549, 2), 0.65);
            assert_eq!(round_to(0.65, 3), 0.65);
        }
    }
}
