//! Start/end of season dates sampled from global crop calendar rasters.

use crate::{
    doy::{day_of_year_to_date, end_year},
    raster::{Raster, C},
    CropcalError,
};
use chrono::NaiveDate;
use geo::geometry::Coord;
use log::debug;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Growing season covered by a pair of calendar rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonKind {
    Summer,
    Winter,
}

impl SeasonKind {
    pub const ALL: [SeasonKind; 2] = [SeasonKind::Summer, SeasonKind::Winter];

    /// File names of the (start, end) of season rasters.
    pub fn file_names(self) -> CalendarFiles {
        match self {
            Self::Summer => CalendarFiles {
                start: "sc_sos_3x3_v2.tiff",
                end: "sc_eos_3x3_v2.tiff",
            },
            Self::Winter => CalendarFiles {
                start: "wc_sos_3x3_v2.tiff",
                end: "wc_eos_3x3_v2.tiff",
            },
        }
    }
}

impl fmt::Display for SeasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summer => f.write_str("summer"),
            Self::Winter => f.write_str("winter"),
        }
    }
}

impl FromStr for SeasonKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "summer" => Ok(Self::Summer),
            "winter" => Ok(Self::Winter),
            other => Err(format!("unknown season {other:?}, expected summer or winter")),
        }
    }
}

/// Start and end of season raster file names for one [`SeasonKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFiles {
    pub start: &'static str,
    pub end: &'static str,
}

impl CalendarFiles {
    /// Returns (start, end) paths inside `dir`.
    pub fn paths_in(&self, dir: &Path) -> (PathBuf, PathBuf) {
        (dir.join(self.start), dir.join(self.end))
    }
}

/// Season boundaries at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonDates {
    /// Raw start of season day-of-year.
    pub start_day: i64,
    /// Raw end of season day-of-year.
    pub end_day: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonDates {
    /// Converts raw day-of-year values, rolling the end into
    /// `year + 1` when the season wraps the calendar year.
    pub fn from_days(start_day: i64, end_day: i64, year: i32) -> Result<Self, CropcalError> {
        let start = day_of_year_to_date(start_day, year)?;
        let end = day_of_year_to_date(end_day, end_year(start_day, end_day, year))?;
        Ok(Self {
            start_day,
            end_day,
            start,
            end,
        })
    }
}

/// Samples start/end of season rasters at `point` and returns the
/// corresponding dates for reference `year`.
///
/// Each raster is opened, sampled once and closed.
pub fn season_dates<P, Q>(
    point: Coord<C>,
    start_season_tif: P,
    end_season_tif: Q,
    year: i32,
) -> Result<SeasonDates, CropcalError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let start_day = Raster::open(start_season_tif)?.sample(point)?;
    let end_day = Raster::open(end_season_tif)?.sample(point)?;
    debug!("season days at {point:?}: start {start_day}, end {end_day}");
    SeasonDates::from_days(start_day, end_day, year)
}
