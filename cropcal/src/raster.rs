//! Single-band GeoTIFF rasters addressed by geographic coordinate.

use crate::CropcalError;
use geo::geometry::Coord;
use log::debug;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tiff::{
    decoder::{Decoder, DecodingResult, Limits},
    tags::Tag,
};

/// Floating point type used for raster lookup.
pub type C = f64;

/// Affine pixel → map transform.
///
/// Coefficients follow the usual `Affine(a, b, c, d, e, f)` layout:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub a: C,
    pub b: C,
    pub c: C,
    pub d: C,
    pub e: C,
    pub f: C,
}

impl GeoTransform {
    /// North-up transform with the given upper-left corner and pixel
    /// size. `pixel_height` is positive; rows grow southward.
    pub fn north_up(origin: Coord<C>, pixel_width: C, pixel_height: C) -> Self {
        Self {
            a: pixel_width,
            b: 0.0,
            c: origin.x,
            d: 0.0,
            e: -pixel_height,
            f: origin.y,
        }
    }

    /// Returns the map coordinate of pixel corner `(row, col)`.
    pub fn xy(&self, row: C, col: C) -> Coord<C> {
        Coord {
            x: self.a * col + self.b * row + self.c,
            y: self.d * col + self.e * row + self.f,
        }
    }

    /// Returns the `(row, col)` of the pixel containing `coord`.
    ///
    /// Fractional pixel positions are floored, so a coordinate on a
    /// pixel's upper-left edge belongs to that pixel.
    #[allow(clippy::cast_possible_truncation)]
    pub fn rowcol(&self, coord: Coord<C>) -> Option<(isize, isize)> {
        let det = self.a * self.e - self.b * self.d;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = coord.x - self.c;
        let dy = coord.y - self.f;
        let col = (self.e * dx - self.b * dy) / det;
        let row = (-self.d * dx + self.a * dy) / det;
        Some((row.floor() as isize, col.floor() as isize))
    }

    /// Reads the transform from GeoTIFF model tags.
    ///
    /// `ModelTransformationTag` wins when present; otherwise the
    /// transform is built from `ModelPixelScaleTag` and the first
    /// `ModelTiepointTag`.
    fn from_tags<R>(decoder: &mut Decoder<R>) -> Result<Option<Self>, CropcalError>
    where
        R: std::io::Read + std::io::Seek,
    {
        if let Some(m) = decoder
            .find_tag(Tag::ModelTransformationTag)?
            .map(|v| v.into_f64_vec())
            .transpose()?
        {
            if m.len() >= 8 {
                return Ok(Some(Self {
                    a: m[0],
                    b: m[1],
                    c: m[3],
                    d: m[4],
                    e: m[5],
                    f: m[7],
                }));
            }
        }

        let scale = decoder
            .find_tag(Tag::ModelPixelScaleTag)?
            .map(|v| v.into_f64_vec())
            .transpose()?;
        let tiepoint = decoder
            .find_tag(Tag::ModelTiepointTag)?
            .map(|v| v.into_f64_vec())
            .transpose()?;

        match (scale, tiepoint) {
            (Some(scale), Some(tie)) if scale.len() >= 2 && tie.len() >= 6 => {
                let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
                let (sx, sy) = (scale[0], scale[1]);
                Ok(Some(Self {
                    a: sx,
                    b: 0.0,
                    c: x - i * sx,
                    d: 0.0,
                    e: -sy,
                    f: y + j * sy,
                }))
            }
            _ => Ok(None),
        }
    }
}

/// Band one of a georeferenced raster, held in memory.
pub struct Raster {
    /// File this raster was read from.
    path: PathBuf,

    /// Pixel to map transform.
    transform: GeoTransform,

    /// Number of (columns, rows) in this raster.
    dimensions: (usize, usize),

    /// Row-major samples of band one.
    samples: Box<[i64]>,
}

impl Raster {
    /// Returns a Raster read into memory from the GeoTIFF at `path`.
    ///
    /// The file is closed before this returns.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CropcalError> {
        let path = path.as_ref().to_owned();
        debug!("opening {path:?}");

        let mut decoder =
            Decoder::new(BufReader::new(File::open(&path)?))?.with_limits(Limits::unlimited());

        let transform = GeoTransform::from_tags(&mut decoder)?
            .ok_or_else(|| CropcalError::NoTransform(path.clone()))?;
        if transform.rowcol(Coord { x: 0.0, y: 0.0 }).is_none() {
            return Err(CropcalError::SingularTransform(path));
        }

        let (cols, rows) = {
            let (w, h) = decoder.dimensions()?;
            (w as usize, h as usize)
        };
        let pixels = cols * rows;

        let samples = match decoder.read_image()? {
            DecodingResult::U8(v) => band_one(&v, pixels, i64::from),
            DecodingResult::U16(v) => band_one(&v, pixels, i64::from),
            DecodingResult::U32(v) => band_one(&v, pixels, i64::from),
            #[allow(clippy::cast_possible_wrap)]
            DecodingResult::U64(v) => band_one(&v, pixels, |s| s as i64),
            DecodingResult::I8(v) => band_one(&v, pixels, i64::from),
            DecodingResult::I16(v) => band_one(&v, pixels, i64::from),
            DecodingResult::I32(v) => band_one(&v, pixels, i64::from),
            DecodingResult::I64(v) => band_one(&v, pixels, |s| s),
            #[allow(clippy::cast_possible_truncation)]
            DecodingResult::F32(v) => band_one(&v, pixels, |s| s as i64),
            #[allow(clippy::cast_possible_truncation)]
            DecodingResult::F64(v) => band_one(&v, pixels, |s| s as i64),
            _ => return Err(CropcalError::SampleFormat(path)),
        }
        .ok_or_else(|| CropcalError::RasterLen(pixels, path.clone()))?;

        Ok(Self {
            path,
            transform,
            dimensions: (cols, rows),
            samples,
        })
    }

    /// Returns a raster built from in-memory samples.
    pub fn from_samples(
        transform: GeoTransform,
        dimensions: (usize, usize),
        samples: Vec<i64>,
    ) -> Result<Self, CropcalError> {
        let path = PathBuf::from("<memory>");
        if samples.len() != dimensions.0 * dimensions.1 {
            return Err(CropcalError::RasterLen(samples.len(), path));
        }
        Ok(Self {
            path,
            transform,
            dimensions,
            samples: samples.into_boxed_slice(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Returns (columns, rows).
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the sample at the given geo coordinates, if inside the
    /// raster.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn get(&self, coord: Coord<C>) -> Option<i64> {
        let (row, col) = self.transform.rowcol(coord)?;
        if 0 <= row
            && row < self.dimensions.1 as isize
            && 0 <= col
            && col < self.dimensions.0 as isize
        {
            Some(self.get_rc((row as usize, col as usize)))
        } else {
            None
        }
    }

    /// Returns the sample at the given geo coordinates or an
    /// out-of-bounds error.
    pub fn sample(&self, coord: Coord<C>) -> Result<i64, CropcalError> {
        self.get(coord).ok_or_else(|| CropcalError::OutOfBounds {
            x: coord.x,
            y: coord.y,
            path: self.path.clone(),
        })
    }
}

/// Private API.
impl Raster {
    fn get_rc(&self, (row, col): (usize, usize)) -> i64 {
        self.samples[row * self.dimensions.0 + col]
    }
}

/// Widens the first sample of every pixel to `i64`.
///
/// Returns `None` when `raw` isn't a whole number of pixels.
fn band_one<T: Copy>(raw: &[T], pixels: usize, widen: impl Fn(T) -> i64) -> Option<Box<[i64]>> {
    if pixels == 0 || raw.is_empty() || raw.len() % pixels != 0 {
        return None;
    }
    let samples_per_pixel = raw.len() / pixels;
    Some(
        raw.iter()
            .step_by(samples_per_pixel)
            .map(|&s| widen(s))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{band_one, Coord, GeoTransform, Raster};
    use crate::{test_util::write_geotiff, CropcalError};
    use assert_approx_eq::assert_approx_eq;

    const ORIGIN: Coord = Coord { x: 10.0, y: 50.0 };

    fn grid() -> Vec<u16> {
        // 4 columns x 3 rows, value = 10 * row + col.
        (0..3)
            .flat_map(|row| (0..4).map(move |col| 10 * row + col))
            .collect()
    }

    #[test]
    fn test_rowcol_north_up() {
        let t = GeoTransform::north_up(ORIGIN, 0.5, 0.25);
        assert_eq!(t.rowcol(Coord { x: 10.0, y: 50.0 }), Some((0, 0)));
        assert_eq!(t.rowcol(Coord { x: 10.49, y: 49.76 }), Some((0, 0)));
        assert_eq!(t.rowcol(Coord { x: 10.5, y: 49.75 }), Some((1, 1)));
        assert_eq!(t.rowcol(Coord { x: 9.9, y: 50.1 }), Some((-1, -1)));
    }

    #[test]
    fn test_xy_inverts_rowcol() {
        let t = GeoTransform::north_up(ORIGIN, 0.5, 0.25);
        let corner = t.xy(2.0, 3.0);
        assert_approx_eq!(corner.x, 11.5);
        assert_approx_eq!(corner.y, 49.5);
        let center = t.xy(2.5, 3.5);
        assert_eq!(t.rowcol(center), Some((2, 3)));
    }

    #[test]
    fn test_singular_transform() {
        let t = GeoTransform {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        };
        assert_eq!(t.rowcol(ORIGIN), None);
    }

    #[test]
    fn test_open_scale_tiepoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_geotiff(dir.path(), "grid.tiff", (4, 3), ORIGIN, 1.0, &grid());
        let raster = Raster::open(&path).unwrap();
        assert_eq!(raster.dimensions(), (4, 3));
        assert_eq!(
            *raster.transform(),
            GeoTransform::north_up(ORIGIN, 1.0, 1.0)
        );
        assert_eq!(raster.get(Coord { x: 10.5, y: 49.5 }), Some(0));
        assert_eq!(raster.get(Coord { x: 13.5, y: 49.5 }), Some(3));
        assert_eq!(raster.get(Coord { x: 11.5, y: 47.5 }), Some(21));
    }

    #[test]
    fn test_out_of_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_geotiff(dir.path(), "grid.tiff", (4, 3), ORIGIN, 1.0, &grid());
        let raster = Raster::open(path).unwrap();
        // A smidge east, west, north and south of the raster.
        assert_eq!(raster.get(Coord { x: 14.1, y: 49.5 }), None);
        assert_eq!(raster.get(Coord { x: 9.9, y: 49.5 }), None);
        assert_eq!(raster.get(Coord { x: 10.5, y: 50.1 }), None);
        assert_eq!(raster.get(Coord { x: 10.5, y: 46.9 }), None);
        assert!(matches!(
            raster.sample(Coord { x: 9.9, y: 49.5 }),
            Err(CropcalError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Raster::open(dir.path().join("nope.tiff")),
            Err(CropcalError::Io(_))
        ));
    }

    #[test]
    fn test_band_one_interleaved() {
        let rgb = [1_u8, 100, 200, 2, 101, 201];
        assert_eq!(
            band_one(&rgb, 2, i64::from).as_deref(),
            Some(&[1_i64, 2][..])
        );
        assert!(band_one(&rgb, 4, i64::from).is_none());
    }

    #[test]
    fn test_from_samples_len_mismatch() {
        let t = GeoTransform::north_up(ORIGIN, 1.0, 1.0);
        assert!(Raster::from_samples(t, (2, 2), vec![1, 2, 3]).is_err());
        let raster = Raster::from_samples(t, (2, 2), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(raster.sample(Coord { x: 11.5, y: 48.5 }).unwrap(), 4);
    }
}
