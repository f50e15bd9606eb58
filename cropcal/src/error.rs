use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropcalError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("no georeferencing tags in {0}")]
    NoTransform(PathBuf),

    #[error("non-invertible geotransform in {0}")]
    SingularTransform(PathBuf),

    #[error("unsupported sample format in {0}")]
    SampleFormat(PathBuf),

    #[error("invalid raster len {0} for {1}")]
    RasterLen(usize, PathBuf),

    #[error("point ({x}, {y}) is outside {path}")]
    OutOfBounds { x: f64, y: f64, path: PathBuf },

    #[error("day_of_year must be between 1 and 366, got {0}")]
    InvalidDayOfYear(i64),

    #[error("{0} is not a leap year")]
    NotLeapYear(i32),
}
