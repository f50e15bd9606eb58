//! Global crop calendar rasters.
//!
//! The calendars are single-band GeoTIFFs whose samples are the
//! day-of-year a growing season starts (`sos`) or ends (`eos`).
//!
//! # References
//!
//! 1. [Fields of The World QGIS plugin resources](https://github.com/fieldsoftheworld/ftw-qgis-plugin)
//! 1. [GeoTIFF format specification](https://docs.ogc.org/is/19-008r4/19-008r4.html)
//! 1. [Cropland Data Layer legend](https://www.nass.usda.gov/Research_and_Science/Cropland/metadata/meta.php)

pub mod calendar;
pub mod cdl;
pub mod doy;
mod error;
pub mod raster;

pub use crate::{
    calendar::{season_dates, CalendarFiles, SeasonDates, SeasonKind},
    doy::day_of_year_to_date,
    error::CropcalError,
    raster::{GeoTransform, Raster},
};
pub use chrono::NaiveDate;
pub use geo;
