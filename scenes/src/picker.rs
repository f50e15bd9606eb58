//! Headless MGRS tile chooser over a Sentinel-2 grid GeoJSON.
//!
//! Selection state is an explicit [`PickerState`] value; every event
//! consumes the current state and returns the next one.

use crate::ScenesError;
use geo::{
    geometry::{Geometry, Point},
    Contains,
};
use geojson::{Feature, GeoJson};
use log::debug;
use std::path::{Path, PathBuf};

/// Feature property holding the tile identifier.
const NAME_PROPERTY: &str = "Name";

/// One grid cell.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: String,
    pub geometry: Geometry<f64>,
}

/// All tiles of a grid file, in file order.
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Loads a grid from a GeoJSON file of named tile features.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenesError> {
        let path = path.as_ref();
        debug!("loading tile grid {path:?}");
        let geojson: GeoJson = std::fs::read_to_string(path)?.parse()?;
        Self::from_geojson(geojson).map_err(|e| match e {
            ScenesError::TileGrid(_, msg) => ScenesError::TileGrid(path.to_owned(), msg),
            other => other,
        })
    }

    /// Builds a grid from parsed GeoJSON. Features without a name or
    /// geometry are skipped.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, ScenesError> {
        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => {
                return Err(ScenesError::TileGrid(
                    PathBuf::new(),
                    "expected features, found a bare geometry".to_owned(),
                ))
            }
        };
        let mut tiles = Vec::with_capacity(features.len());
        for feature in features {
            if let Some(tile) = Self::tile(feature)? {
                tiles.push(tile);
            }
        }
        Ok(Self { tiles })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Returns the first tile containing `point`.
    pub fn tile_at(&self, point: Point<f64>) -> Option<&Tile> {
        self.tiles.iter().find(|t| match &t.geometry {
            Geometry::Polygon(poly) => poly.contains(&point),
            Geometry::MultiPolygon(multi) => multi.contains(&point),
            _ => false,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter()
    }
}

/// Private API.
impl TileGrid {
    fn tile(feature: Feature) -> Result<Option<Tile>, ScenesError> {
        let Some(id) = feature
            .property(NAME_PROPERTY)
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
        else {
            return Ok(None);
        };
        let Some(geometry) = feature.geometry else {
            return Ok(None);
        };
        let geometry = Geometry::<f64>::try_from(geometry)?;
        Ok(Some(Tile { id, geometry }))
    }
}

/// Tile picker state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerState {
    selected: Option<String>,
    highlighted: Option<String>,
}

impl PickerState {
    /// Starts with `initial` selected, if given.
    pub fn new(grid: &TileGrid, initial: Option<&str>) -> Self {
        match initial {
            Some(id) if !id.is_empty() => Self::default().select(grid, id),
            _ => Self::default(),
        }
    }

    /// Selects `id`. It is highlighted only when `grid` knows it.
    pub fn select(self, grid: &TileGrid, id: &str) -> Self {
        let highlighted = grid.get(id).map(|t| t.id.clone());
        Self {
            selected: Some(id.to_owned()),
            highlighted,
        }
    }

    /// Handles a click at `point`. Clicks outside every tile leave the
    /// state untouched.
    pub fn click(self, grid: &TileGrid, point: Point<f64>) -> Self {
        match grid.tile_at(point).map(|t| t.id.clone()) {
            Some(id) => self.select(grid, &id),
            None => self,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    /// Human readable status line.
    pub fn status(&self) -> String {
        match &self.selected {
            None => "Click a tile to select its MGRS ID.".to_owned(),
            Some(id) => format!("Selected tile: {id}"),
        }
    }
}
