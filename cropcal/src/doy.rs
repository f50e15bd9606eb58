//! Day-of-year to calendar date conversion.

use crate::CropcalError;
use chrono::{Datelike, NaiveDate};

/// Returns the date of `day_of_year` (1-based) in `year`.
///
/// Day 366 is only valid for leap years.
pub fn day_of_year_to_date(day_of_year: i64, year: i32) -> Result<NaiveDate, CropcalError> {
    let ordinal = u32::try_from(day_of_year)
        .ok()
        .filter(|d| (1..=366).contains(d))
        .ok_or(CropcalError::InvalidDayOfYear(day_of_year))?;
    NaiveDate::from_yo_opt(year, ordinal).ok_or(CropcalError::NotLeapYear(year))
}

/// Returns the calendar year the season's end falls in.
///
/// A season whose end day precedes its start day crosses into the
/// following year (e.g. a winter crop sown in October and harvested in
/// June).
pub fn end_year(start_day: i64, end_day: i64, year: i32) -> i32 {
    if end_day < start_day {
        year + 1
    } else {
        year
    }
}

/// Returns the 1-based day-of-year of `date`.
pub fn date_to_day_of_year(date: NaiveDate) -> i64 {
    i64::from(date.ordinal())
}

#[cfg(test)]
mod tests {
    use super::{date_to_day_of_year, day_of_year_to_date, end_year, NaiveDate};
    use crate::CropcalError;

    fn is_leap(year: i32) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    #[test]
    fn test_day_one_is_new_years_day() {
        for year in 1900..=2100 {
            assert_eq!(
                day_of_year_to_date(1, year).unwrap(),
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
            );
        }
    }

    #[test]
    fn test_day_366_only_in_leap_years() {
        for year in 1900..=2100 {
            let res = day_of_year_to_date(366, year);
            if is_leap(year) {
                assert_eq!(res.unwrap(), NaiveDate::from_ymd_opt(year, 12, 31).unwrap());
            } else {
                assert!(matches!(res, Err(CropcalError::NotLeapYear(y)) if y == year));
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        for doy in [-1, 0, 367, 1000] {
            assert!(matches!(
                day_of_year_to_date(doy, 2020),
                Err(CropcalError::InvalidDayOfYear(d)) if d == doy
            ));
        }
    }

    #[test]
    fn test_mid_year() {
        assert_eq!(
            day_of_year_to_date(70, 2020).unwrap(),
            NaiveDate::from_ymd_opt(2020, 3, 10).unwrap()
        );
        assert_eq!(
            day_of_year_to_date(70, 2021).unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 11).unwrap()
        );
        assert_eq!(
            date_to_day_of_year(NaiveDate::from_ymd_opt(2021, 3, 11).unwrap()),
            70
        );
    }

    #[test]
    fn test_end_year_rollover() {
        assert_eq!(end_year(280, 160, 2020), 2021);
        assert_eq!(end_year(100, 250, 2020), 2020);
        assert_eq!(end_year(100, 100, 2020), 2020);
    }
}
