//! Sentinel-2 scene search around a crop growing season.
//!
//! Given start and end of season dates, [`SeasonWindows`] derives two
//! search windows and [`Selector`] finds the least cloudy scene of one
//! MGRS tile in each, relaxing the cloud cover limit until both
//! windows are satisfied.
//!
//! # References
//!
//! 1. [STAC API item search](https://github.com/radiantearth/stac-api-spec/tree/main/item-search)
//! 1. [Planetary Computer Sentinel-2 L2A](https://planetarycomputer.microsoft.com/dataset/sentinel-2-l2a)

pub mod catalog;
mod error;
pub mod item;
pub mod picker;
pub mod planetary;
pub mod preview;
pub mod select;
pub mod window;

pub use crate::{
    catalog::{Catalog, CatalogConfig, SearchQuery},
    error::ScenesError,
    item::Item,
    picker::{PickerState, TileGrid},
    planetary::PlanetaryComputer,
    select::{best_images, BestImages, Selector},
    window::{DateWindow, SeasonWindows, Window},
};
pub use geo;
