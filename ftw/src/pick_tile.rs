use crate::options::PickTile;
use anyhow::{Context, Result};
use log::warn;
use scenes::{geo::point, PickerState, TileGrid};

impl PickTile {
    pub fn run(&self) -> Result<()> {
        let grid = TileGrid::load(&self.grid)
            .with_context(|| format!("loading tile grid {:?}", self.grid))?;
        let mut state = PickerState::new(&grid, self.id.as_deref());
        for click in &self.clicks {
            let at = point!(x: click.lon, y: click.lat);
            if grid.tile_at(at).is_none() {
                warn!("no tile at {},{}", click.lat, click.lon);
            }
            state = state.click(&grid, at);
        }
        if let Some(id) = state.selected() {
            if state.highlighted().is_none() {
                warn!("tile {id} is not in {:?}", self.grid);
            }
        }
        println!("{}", state.status());
        Ok(())
    }
}
