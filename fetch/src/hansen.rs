//! Hansen/GLAD Global Forest Change 10°×10° granules.

use crate::{Download, FetchError, Fetcher};
use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
};

pub const HANSEN_BASE_URL: &str = "https://storage.googleapis.com/earthenginepartners-hansen";
pub const DEFAULT_VERSION: &str = "GFC-2024-v1.12";
pub const DEFAULT_LAYER: &str = "lossyear";

/// Granule edge length in degrees.
const GRANULE_DEG: i32 = 10;

/// A granule named by its top-left (north-west) corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GranuleCode {
    pub lat: i32,
    pub lon: i32,
}

impl GranuleCode {
    /// Latitude label, e.g. `"10N"` or `"00N"`.
    pub fn lat_label(&self) -> String {
        let n_s = if self.lat.is_negative() { 'S' } else { 'N' };
        format!("{:02}{n_s}", self.lat.abs())
    }

    /// Longitude label, e.g. `"010W"` or `"000E"`.
    pub fn lon_label(&self) -> String {
        let e_w = if self.lon.is_negative() { 'W' } else { 'E' };
        format!("{:03}{e_w}", self.lon.abs())
    }
}

impl fmt::Display for GranuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lat_label(), self.lon_label())
    }
}

/// Granules order by their labels.
impl Ord for GranuleCode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.lat_label(), self.lon_label()).cmp(&(other.lat_label(), other.lon_label()))
    }
}

impl PartialOrd for GranuleCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns the granules covering a lat/lon bounding box, sorted by
/// label.
///
/// A box with `lon_min > lon_max` crosses the antimeridian and is
/// split in two. Coordinates are clamped to valid latitudes and
/// longitudes.
#[allow(clippy::cast_possible_truncation)]
pub fn granule_codes_from_bbox(
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
) -> Vec<GranuleCode> {
    let (lat_min, lat_max) = (lat_min.clamp(-90.0, 90.0), lat_max.clamp(-90.0, 90.0));
    let (lon_min, lon_max) = (lon_min.clamp(-180.0, 180.0), lon_max.clamp(-180.0, 180.0));
    let lon_ranges = if lon_min <= lon_max {
        vec![(lon_min, lon_max)]
    } else {
        vec![(lon_min, 180.0), (-180.0, lon_max)]
    };

    let deg = f64::from(GRANULE_DEG);
    let step = GRANULE_DEG.unsigned_abs() as usize;
    let mut granules = BTreeSet::new();
    for (lo_min, lo_max) in lon_ranges {
        let lat_start = (lat_min / deg).ceil() as i32 * GRANULE_DEG;
        let lat_end = (lat_max / deg).ceil() as i32 * GRANULE_DEG;
        let lon_start = (lo_min / deg).floor() as i32 * GRANULE_DEG;
        let lon_end = (lo_max / deg).floor() as i32 * GRANULE_DEG;

        for lat in (lat_start..=lat_end).step_by(step) {
            for lon in (lon_start..=lon_end).step_by(step) {
                granules.insert(GranuleCode { lat, lon });
            }
        }
    }
    granules.into_iter().collect()
}

/// A Global Forest Change product release and layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HansenProduct {
    pub version: String,
    pub layer: String,
}

impl Default for HansenProduct {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_owned(),
            layer: DEFAULT_LAYER.to_owned(),
        }
    }
}

impl HansenProduct {
    pub fn file_name(&self, code: GranuleCode) -> String {
        format!(
            "Hansen_{}_{}_{}_{}.tif",
            self.version,
            self.layer,
            code.lat_label(),
            code.lon_label()
        )
    }

    pub fn url(&self, code: GranuleCode) -> String {
        format!("{HANSEN_BASE_URL}/{}/{}", self.version, self.file_name(code))
    }

    /// File names of every granule covering the bounding box.
    pub fn file_names_from_bbox(
        &self,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Vec<String> {
        granule_codes_from_bbox(lat_min, lat_max, lon_min, lon_max)
            .into_iter()
            .map(|code| self.file_name(code))
            .collect()
    }
}

impl Fetcher {
    /// Downloads `codes` of `product` into `dir`, skipping granules
    /// already there. Stops at the first failure.
    pub fn hansen_granules(
        &self,
        product: &HansenProduct,
        codes: &[GranuleCode],
        dir: &Path,
    ) -> Result<Vec<(PathBuf, Download)>, FetchError> {
        codes
            .iter()
            .map(|&code| {
                let path = dir.join(product.file_name(code));
                let outcome = self.fetch_if_absent(&product.url(code), &path)?;
                Ok((path, outcome))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{granule_codes_from_bbox, GranuleCode, HansenProduct};

    fn labels(codes: &[GranuleCode]) -> Vec<(String, String)> {
        codes
            .iter()
            .map(|c| (c.lat_label(), c.lon_label()))
            .collect()
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(a, b)| ((*a).to_owned(), (*b).to_owned()))
            .collect()
    }

    #[test]
    fn test_bbox_around_origin() {
        let codes = granule_codes_from_bbox(-5.0, 5.0, -5.0, 5.0);
        assert_eq!(
            labels(&codes),
            pairs(&[
                ("00N", "000E"),
                ("00N", "010W"),
                ("10N", "000E"),
                ("10N", "010W"),
            ])
        );
    }

    #[test]
    fn test_single_granule() {
        // Mt. Washington sits in the granule whose NW corner is 50N 080W.
        let codes = granule_codes_from_bbox(44.2, 44.3, -71.4, -71.2);
        assert_eq!(codes, vec![GranuleCode { lat: 50, lon: -80 }]);
        assert_eq!(codes[0].to_string(), "50N_080W");
    }

    #[test]
    fn test_southern_hemisphere() {
        let codes = granule_codes_from_bbox(-23.0, -21.0, 131.0, 133.0);
        assert_eq!(labels(&codes), pairs(&[("20S", "130E")]));
    }

    #[test]
    fn test_antimeridian_split() {
        let codes = granule_codes_from_bbox(60.0, 65.0, 175.0, -175.0);
        assert_eq!(
            labels(&codes),
            pairs(&[
                ("60N", "170E"),
                ("60N", "180E"),
                ("60N", "180W"),
                ("70N", "170E"),
                ("70N", "180E"),
                ("70N", "180W"),
            ])
        );
    }

    #[test]
    fn test_out_of_range_coordinates_clamped() {
        let codes = granule_codes_from_bbox(1e10, 1e10, -1e10, -175.0);
        assert_eq!(labels(&codes), pairs(&[("90N", "180W")]));
    }

    #[test]
    fn test_file_names() {
        let product = HansenProduct::default();
        let names = product.file_names_from_bbox(44.2, 44.3, -71.4, -71.2);
        assert_eq!(names, ["Hansen_GFC-2024-v1.12_lossyear_50N_080W.tif"]);
        assert_eq!(
            product.url(GranuleCode { lat: 50, lon: -80 }),
            "https://storage.googleapis.com/earthenginepartners-hansen/GFC-2024-v1.12/Hansen_GFC-2024-v1.12_lossyear_50N_080W.tif"
        );
        let treecover = HansenProduct {
            layer: "treecover2000".to_owned(),
            ..HansenProduct::default()
        };
        assert_eq!(
            treecover.file_name(GranuleCode { lat: -10, lon: 20 }),
            "Hansen_GFC-2024-v1.12_treecover2000_10S_020E.tif"
        );
    }
}
