//! Catalog search abstraction and its configuration.

use crate::{item::Item, window::DateWindow, ScenesError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

pub const PLANETARY_COMPUTER_STAC: &str = "https://planetarycomputer.microsoft.com/api/stac/v1";
pub const PLANETARY_COMPUTER_SAS: &str = "https://planetarycomputer.microsoft.com/api/sas/v1";
pub const SENTINEL_2_L2A: &str = "sentinel-2-l2a";

/// Items with this much missing data or more are never returned.
pub const MAX_NODATA_PERCENT: f64 = 10.0;

/// One filtered catalog search.
///
/// Both upper bounds are exclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub collection: String,
    pub window: DateWindow,
    pub mgrs_tile: String,
    pub max_cloud_cover: f64,
    pub max_nodata: f64,
    pub limit: usize,
}

impl SearchQuery {
    /// STAC API `POST /search` request body.
    pub fn body(&self) -> Value {
        json!({
            "collections": [self.collection],
            "datetime": self.window.rfc3339_interval(),
            "query": {
                "eo:cloud_cover": { "lt": self.max_cloud_cover },
                "s2:mgrs_tile": { "eq": self.mgrs_tile },
                "s2:nodata_pixel_percentage": { "lt": self.max_nodata },
            },
            "limit": self.limit,
        })
    }
}

/// Something that can answer a [`SearchQuery`].
///
/// Implementations return every matching item; callers may count and
/// scan the result as often as they like.
pub trait Catalog {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, ScenesError>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, ScenesError> {
        (**self).search(query)
    }
}

/// Catalog endpoint and search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// STAC API root.
    pub stac_url: String,

    /// SAS token API root, used when signing asset URLs.
    pub sas_url: String,

    pub collection: String,

    /// Exclusive upper bound on `s2:nodata_pixel_percentage`.
    pub max_nodata: f64,

    /// Items requested per page.
    pub page_limit: usize,

    /// Append SAS tokens to blob storage asset hrefs.
    pub sign_assets: bool,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            stac_url: PLANETARY_COMPUTER_STAC.to_owned(),
            sas_url: PLANETARY_COMPUTER_SAS.to_owned(),
            collection: SENTINEL_2_L2A.to_owned(),
            max_nodata: MAX_NODATA_PERCENT,
            page_limit: 100,
            sign_assets: true,
            timeout_secs: 60,
        }
    }
}

impl CatalogConfig {
    /// Reads a JSON config file. Missing fields take default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenesError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, SearchQuery, SENTINEL_2_L2A};
    use crate::window::SeasonWindows;
    use chrono::{DateTime, Timelike};
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_query_body() {
        let windows = SeasonWindows::from_iso("2020-03-10", "2020-07-01").unwrap();
        let query = SearchQuery {
            collection: SENTINEL_2_L2A.to_owned(),
            window: windows.a,
            mgrs_tile: "33UUP".to_owned(),
            max_cloud_cover: 20.0,
            max_nodata: 10.0,
            limit: 100,
        };
        assert_eq!(
            query.body(),
            json!({
                "collections": ["sentinel-2-l2a"],
                "datetime": "2020-02-24T00:00:00Z/2020-03-25T23:59:59Z",
                "query": {
                    "eo:cloud_cover": {"lt": 20.0},
                    "s2:mgrs_tile": {"eq": "33UUP"},
                    "s2:nodata_pixel_percentage": {"lt": 10.0}
                },
                "limit": 100
            })
        );
    }

    #[test]
    fn test_datetime_covers_last_day() {
        let windows = SeasonWindows::from_iso("2020-03-10", "2020-07-01").unwrap();
        let query = SearchQuery {
            collection: SENTINEL_2_L2A.to_owned(),
            window: windows.b,
            mgrs_tile: "33UUP".to_owned(),
            max_cloud_cover: 20.0,
            max_nodata: 10.0,
            limit: 100,
        };
        let body = query.body();
        let interval = body["datetime"].as_str().unwrap();
        let (start, end) = interval.split_once('/').unwrap();
        let start = DateTime::parse_from_rfc3339(start).unwrap();
        let end = DateTime::parse_from_rfc3339(end).unwrap();
        assert_eq!(start.date_naive(), windows.b.start);
        assert_eq!(end.date_naive(), windows.b.end);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"collection": "landsat-c2-l2", "sign_assets": false}}"#).unwrap();
        let config = CatalogConfig::load(file.path()).unwrap();
        assert_eq!(config.collection, "landsat-c2-l2");
        assert!(!config.sign_assets);
        assert_eq!(config.page_limit, CatalogConfig::default().page_limit);
    }
}
