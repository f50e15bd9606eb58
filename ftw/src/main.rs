mod best_images;
mod calendar;
mod crop_name;
mod download;
mod options;
mod pick_tile;
mod windows;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use options::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Windows(windows) => windows.run(),
        Command::Calendar(calendar) => calendar.run(),
        Command::BestImages(best_images) => best_images.run(),
        Command::DownloadCalendars(download) => download.run(),
        Command::Hansen(hansen) => hansen.run(),
        Command::CropName(crop_name) => crop_name.run(),
        Command::PickTile(pick_tile) => pick_tile.run(),
    }
}
