use crate::window::{DateWindow, Window};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenesError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD: {1}")]
    DateParse(String, #[source] chrono::ParseError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("invalid tile grid {0}: {1}")]
    TileGrid(PathBuf, String),

    #[error("item {item} has no {asset:?} asset")]
    MissingAsset { item: String, asset: String },

    #[error(
        "could not find suitable images for window {window} ({} to {}) even with 100% cloud cover",
        .range.start,
        .range.end
    )]
    NoSuitableImage { window: Window, range: DateWindow },
}
