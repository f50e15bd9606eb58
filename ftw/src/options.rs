use anyhow::{anyhow, Error as AnyError};
use clap::{Args, Parser, Subcommand};
use cropcal::SeasonKind;
use std::{path::PathBuf, str::FromStr};

/// Find cloud-free Sentinel-2 scenes bracketing crop growing seasons.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the two search windows for a season.
    Windows(Windows),

    /// Sample start/end of season dates from crop calendar rasters.
    Calendar(Calendar),

    /// Find the least cloudy scene of a tile in each season window.
    BestImages(BestImages),

    /// Download the global crop calendar rasters.
    DownloadCalendars(DownloadCalendars),

    /// List or download Hansen forest change granules for a bounding
    /// box.
    Hansen(Hansen),

    /// Print Cropland Data Layer class names.
    CropName(CropName),

    /// Choose an MGRS tile from a Sentinel-2 grid GeoJSON.
    PickTile(PickTile),
}

/// Start and end of season, either given directly or sampled from
/// crop calendars.
#[derive(Debug, Clone, Args)]
pub struct Season {
    /// Start of season, YYYY-MM-DD.
    #[arg(long, requires = "eos", conflicts_with = "point")]
    pub sos: Option<String>,

    /// End of season, YYYY-MM-DD.
    #[arg(long, requires = "sos")]
    pub eos: Option<String>,

    /// Sample season dates from crop calendars at "lat,lon".
    #[arg(long, required_unless_present = "sos", allow_hyphen_values = true)]
    pub point: Option<LatLon>,

    #[command(flatten)]
    pub calendar: CalendarArgs,
}

/// Which crop calendar rasters to read.
#[derive(Debug, Clone, Args)]
pub struct CalendarArgs {
    /// Directory holding the crop calendar GeoTIFFs.
    #[arg(long, default_value = ".")]
    pub calendar_dir: PathBuf,

    /// Season to sample, summer or winter.
    #[arg(long, default_value_t = SeasonKind::Winter)]
    pub season: SeasonKind,

    /// Crop calendar reference year.
    #[arg(long, default_value_t = 2020)]
    pub year: i32,
}

#[derive(Debug, Clone, Args)]
pub struct Windows {
    #[command(flatten)]
    pub season: Season,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Calendar {
    /// Location to sample, "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub point: LatLon,

    #[command(flatten)]
    pub calendar: CalendarArgs,
}

#[derive(Debug, Clone, Args)]
pub struct BestImages {
    /// MGRS tile identifier, e.g. 33UUP.
    #[arg(short, long)]
    pub tile: String,

    #[command(flatten)]
    pub season: Season,

    /// Preferred maximum cloud cover, in percent.
    #[arg(short = 'c', long, default_value_t = 20.0)]
    pub max_cloud_cover: f64,

    /// Catalog settings file (JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the STAC API root.
    #[arg(long)]
    pub stac_url: Option<String>,

    /// Don't sign asset hrefs.
    #[arg(long)]
    pub no_sign: bool,

    /// Write a side-by-side preview page to this file.
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Print both items as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DownloadCalendars {
    /// Destination directory.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,
}

#[derive(Debug, Clone, Args)]
pub struct Hansen {
    /// "lat_min,lat_max,lon_min,lon_max". lon_min > lon_max crosses
    /// the antimeridian.
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: BBox,

    /// Global Forest Change release.
    #[arg(long, default_value = fetch::hansen::DEFAULT_VERSION)]
    pub version: String,

    #[arg(long, default_value = fetch::hansen::DEFAULT_LAYER)]
    pub layer: String,

    /// Download missing granules instead of listing them.
    #[arg(long)]
    pub download: bool,

    /// Destination directory for downloads.
    #[arg(short, long, default_value = "data")]
    pub dir: PathBuf,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,
}

#[derive(Debug, Clone, Args)]
pub struct CropName {
    /// Print the whole legend.
    #[arg(long, conflicts_with = "codes")]
    pub all: bool,

    /// Class codes to look up.
    #[arg(required_unless_present = "all")]
    pub codes: Vec<u8>,
}

#[derive(Debug, Clone, Args)]
pub struct PickTile {
    /// Sentinel-2 grid GeoJSON with a `Name` property per tile.
    #[arg(short, long, default_value = "s2-grid.json")]
    pub grid: PathBuf,

    /// Initially selected tile.
    #[arg(long)]
    pub id: Option<String>,

    /// Clicks at "lat,lon", applied in order.
    #[arg(long = "click", allow_hyphen_values = true)]
    pub clicks: Vec<LatLon>,
}

/// A "lat,lon" pair in decimal degrees.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let [lat, lon] = parse_floats::<2>(s).ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        Ok(Self { lat, lon })
    }
}

/// A "lat_min,lat_max,lon_min,lon_max" box in decimal degrees.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct BBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl FromStr for BBox {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let [lat_min, lat_max, lon_min, lon_max] = parse_floats::<4>(s)
            .ok_or_else(|| anyhow!("not a valid lat_min,lat_max,lon_min,lon_max"))?;
        if ![lat_min, lat_max].iter().all(|lat| (-90.0..=90.0).contains(lat)) {
            return Err(anyhow!("latitudes must be within [-90, 90]"));
        }
        if ![lon_min, lon_max].iter().all(|lon| (-180.0..=180.0).contains(lon)) {
            return Err(anyhow!("longitudes must be within [-180, 180]"));
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }
}

/// Parses exactly `N` comma separated floats.
fn parse_floats<const N: usize>(s: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = s.split(',');
    for slot in &mut out {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}
