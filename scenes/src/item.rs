//! STAC items as returned by the catalog.

use crate::ScenesError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cloud cover assumed for items that don't report one.
pub const UNKNOWN_CLOUD_COVER: f64 = 100.0;

/// Asset holding a rendered true color preview.
pub const PREVIEW_ASSET: &str = "rendered_preview";

/// A single catalog scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    pub properties: Properties,

    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Acquisition time. STAC allows `null` when a start/end range is
    /// given instead.
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,

    #[serde(rename = "eo:cloud_cover", default)]
    pub cloud_cover: Option<f64>,

    #[serde(rename = "s2:mgrs_tile", default)]
    pub mgrs_tile: Option<String>,

    #[serde(rename = "s2:nodata_pixel_percentage", default)]
    pub nodata_pixel_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Item {
    /// Reported cloud cover percentage, or 100 when missing.
    pub fn cloud_cover(&self) -> f64 {
        self.properties.cloud_cover.unwrap_or(UNKNOWN_CLOUD_COVER)
    }

    /// Acquisition date, if the item has a single datetime.
    pub fn date(&self) -> Option<NaiveDate> {
        self.properties.datetime.map(|dt| dt.date_naive())
    }

    pub fn asset_href(&self, name: &str) -> Result<&str, ScenesError> {
        self.assets
            .get(name)
            .map(|a| a.href.as_str())
            .ok_or_else(|| ScenesError::MissingAsset {
                item: self.id.clone(),
                asset: name.to_owned(),
            })
    }

    pub fn preview_href(&self) -> Result<&str, ScenesError> {
        self.asset_href(PREVIEW_ASSET)
    }
}

/// Returns the item with the lowest cloud cover.
///
/// Ties go to the earliest item in `items`.
pub fn least_cloudy(items: Vec<Item>) -> Option<Item> {
    items
        .into_iter()
        .min_by(|a, b| a.cloud_cover().total_cmp(&b.cloud_cover()))
}
