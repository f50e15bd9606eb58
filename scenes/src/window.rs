//! Search windows bracketing the start and end of a growing season.

use crate::ScenesError;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

/// ISO calendar date format used throughout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days either side of start of season covered by window A.
const WINDOW_A_HALF_WIDTH: i64 = 15;

/// Days before end of season covered by window B.
const WINDOW_B_WIDTH: i64 = 30;

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ScenesError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| ScenesError::DateParse(s.to_owned(), e))
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// RFC 3339 interval spanning whole days, from midnight on `start`
    /// to the last second of `end`.
    pub fn rfc3339_interval(&self) -> String {
        format!("{}T00:00:00Z/{}T23:59:59Z", self.start, self.end)
    }
}

/// Formats as `start/end` ISO dates.
impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

/// Which of the two season windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Window {
    /// Around start of season.
    A,
    /// Leading up to end of season.
    B,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonWindows {
    pub a: DateWindow,
    pub b: DateWindow,
}

impl SeasonWindows {
    /// Returns windows for a season starting `sos` and ending `eos`.
    ///
    /// - A: `sos - 15d ..= sos + 15d`
    /// - B: `eos - 30d ..= eos`
    pub fn new(sos: NaiveDate, eos: NaiveDate) -> Self {
        let half_a = Duration::days(WINDOW_A_HALF_WIDTH);
        Self {
            a: DateWindow {
                start: sos - half_a,
                end: sos + half_a,
            },
            b: DateWindow {
                start: eos - Duration::days(WINDOW_B_WIDTH),
                end: eos,
            },
        }
    }

    /// Same as [`SeasonWindows::new`] but from `YYYY-MM-DD` strings.
    pub fn from_iso(sos: &str, eos: &str) -> Result<Self, ScenesError> {
        Ok(Self::new(parse_date(sos)?, parse_date(eos)?))
    }

    pub fn get(&self, window: Window) -> DateWindow {
        match window {
            Window::A => self.a,
            Window::B => self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date, DateWindow, NaiveDate, SeasonWindows, Window};
    use crate::ScenesError;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_example_season() {
        let windows = SeasonWindows::from_iso("2020-03-10", "2020-07-01").unwrap();
        assert_eq!(
            windows.a,
            DateWindow {
                start: ymd(2020, 2, 24),
                end: ymd(2020, 3, 25),
            }
        );
        assert_eq!(
            windows.b,
            DateWindow {
                start: ymd(2020, 6, 1),
                end: ymd(2020, 7, 1),
            }
        );
    }

    #[test]
    fn test_offsets_hold_everywhere() {
        let mut sos = ymd(2019, 1, 1);
        let eos = ymd(2021, 1, 1);
        while sos < eos {
            let windows = SeasonWindows::new(sos, eos);
            assert_eq!((sos - windows.a.start).num_days(), 15);
            assert_eq!((windows.a.end - sos).num_days(), 15);
            assert_eq!((eos - windows.b.start).num_days(), 30);
            assert_eq!(windows.b.end, eos);
            assert!(windows.a.start <= windows.a.end);
            assert!(windows.b.start <= windows.b.end);
            sos = sos.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_windows_cross_year_boundary() {
        let windows = SeasonWindows::from_iso("2020-01-05", "2021-01-10").unwrap();
        assert_eq!(windows.a.start, ymd(2019, 12, 21));
        assert_eq!(windows.b.start, ymd(2020, 12, 11));
        assert_eq!(windows.get(Window::B), windows.b);
    }

    #[test]
    fn test_malformed_dates() {
        for bad in ["2020-13-01", "2020/03/10", "", "2021-02-29"] {
            assert!(matches!(
                SeasonWindows::from_iso(bad, "2020-07-01"),
                Err(ScenesError::DateParse(s, _)) if s == bad
            ));
        }
        assert!(parse_date("2020-07-01").is_ok());
    }

    #[test]
    fn test_display() {
        let windows = SeasonWindows::from_iso("2020-03-10", "2020-07-01").unwrap();
        assert_eq!(windows.a.to_string(), "2020-02-24/2020-03-25");
        assert_eq!(
            windows.b.rfc3339_interval(),
            "2020-06-01T00:00:00Z/2020-07-01T23:59:59Z"
        );
        assert_eq!(Window::B.to_string(), "B");
    }
}
