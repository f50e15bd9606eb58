//! Least-cloudy scene selection with progressive cloud cover relaxation.

use crate::{
    catalog::{Catalog, CatalogConfig, SearchQuery, MAX_NODATA_PERCENT, SENTINEL_2_L2A},
    item::{least_cloudy, Item},
    window::{DateWindow, SeasonWindows, Window},
    ScenesError,
};
use log::info;
use serde::Serialize;

/// Thresholds tried after the caller's own maximum. The last one must
/// stay at 100.
pub const RELAXED_THRESHOLDS: [f64; 3] = [50.0, 70.0, 100.0];

/// Returns the cloud cover thresholds to try, in order.
pub fn cloud_thresholds(max_cloud_cover: f64) -> [f64; 4] {
    let [t1, t2, t3] = RELAXED_THRESHOLDS;
    [max_cloud_cover, t1, t2, t3]
}

/// One selected scene per season window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestImages {
    pub a: Item,
    pub b: Item,
}

/// Searches a catalog for the least cloudy scene in each season window.
#[derive(Debug, Clone)]
pub struct Selector {
    collection: String,
    max_nodata: f64,
    limit: usize,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            collection: SENTINEL_2_L2A.to_owned(),
            max_nodata: MAX_NODATA_PERCENT,
            limit: 100,
        }
    }
}

impl From<&CatalogConfig> for Selector {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            collection: config.collection.clone(),
            max_nodata: config.max_nodata,
            limit: config.page_limit,
        }
    }
}

impl Selector {
    /// Returns the least cloudy scene of `tile` in each window.
    ///
    /// Cloud cover thresholds are relaxed step by step (see
    /// [`cloud_thresholds`]) until both windows have a match. A window
    /// resolved at one threshold isn't searched again.
    pub fn select<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        windows: &SeasonWindows,
        tile: &str,
        max_cloud_cover: f64,
    ) -> Result<BestImages, ScenesError> {
        let mut best_a = None;
        let mut best_b = None;

        for threshold in cloud_thresholds(max_cloud_cover) {
            if best_a.is_none() {
                best_a = self.find_best(catalog, windows.a, tile, threshold)?;
            }
            if best_b.is_none() {
                best_b = self.find_best(catalog, windows.b, tile, threshold)?;
            }
            if best_a.is_some() && best_b.is_some() {
                break;
            }
        }

        match (best_a, best_b) {
            (Some(a), Some(b)) => Ok(BestImages { a, b }),
            (None, _) => Err(ScenesError::NoSuitableImage {
                window: Window::A,
                range: windows.a,
            }),
            (_, None) => Err(ScenesError::NoSuitableImage {
                window: Window::B,
                range: windows.b,
            }),
        }
    }

    fn find_best<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        window: DateWindow,
        tile: &str,
        threshold: f64,
    ) -> Result<Option<Item>, ScenesError> {
        info!(
            "Searching for images between {} and {} with cloud cover < {threshold}%",
            window.start, window.end
        );
        let query = SearchQuery {
            collection: self.collection.clone(),
            window,
            mgrs_tile: tile.to_owned(),
            max_cloud_cover: threshold,
            max_nodata: self.max_nodata,
            limit: self.limit,
        };
        let best = least_cloudy(catalog.search(&query)?);
        match &best {
            None => info!("No images found with cloud cover < {threshold}%"),
            Some(item) => match item.date() {
                Some(date) => info!(
                    "Found image from {date} with {}% cloud coverage",
                    item.cloud_cover()
                ),
                None => info!(
                    "Found image {} with {}% cloud coverage",
                    item.id,
                    item.cloud_cover()
                ),
            },
        }
        Ok(best)
    }
}

/// [`Selector::select`] with default collection and no-data limit.
pub fn best_images<C: Catalog + ?Sized>(
    catalog: &C,
    windows: &SeasonWindows,
    tile: &str,
    max_cloud_cover: f64,
) -> Result<BestImages, ScenesError> {
    Selector::default().select(catalog, windows, tile, max_cloud_cover)
}
