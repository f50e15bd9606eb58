//! Global crop calendar rasters from the Fields of The World QGIS plugin.

use crate::{Download, FetchError, Fetcher};
use cropcal::SeasonKind;
use std::path::{Path, PathBuf};

pub const CROP_CALENDAR_BASE_URL: &str =
    "https://github.com/fieldsoftheworld/ftw-qgis-plugin/raw/main/resources/global_crop_calendars/";

/// Returns `(file name, url)` of every calendar raster, summer first.
pub fn calendar_urls() -> Vec<(&'static str, String)> {
    SeasonKind::ALL
        .iter()
        .flat_map(|kind| {
            let files = kind.file_names();
            [files.start, files.end]
        })
        .map(|name| (name, format!("{CROP_CALENDAR_BASE_URL}{name}")))
        .collect()
}

impl Fetcher {
    /// Downloads all four crop calendar rasters into `dir`, skipping
    /// those already there. Stops at the first failure.
    pub fn crop_calendars(&self, dir: &Path) -> Result<Vec<(PathBuf, Download)>, FetchError> {
        std::fs::create_dir_all(dir)?;
        calendar_urls()
            .into_iter()
            .map(|(name, url)| {
                let path = dir.join(name);
                let outcome = self.fetch_if_absent(&url, &path)?;
                Ok((path, outcome))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::calendar_urls;
    use crate::{Download, Fetcher};
    use std::time::Duration;

    #[test]
    fn test_calendar_urls() {
        let urls = calendar_urls();
        let names: Vec<_> = urls.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "sc_sos_3x3_v2.tiff",
                "sc_eos_3x3_v2.tiff",
                "wc_sos_3x3_v2.tiff",
                "wc_eos_3x3_v2.tiff"
            ]
        );
        assert_eq!(
            urls[2].1,
            "https://github.com/fieldsoftheworld/ftw-qgis-plugin/raw/main/resources/global_crop_calendars/wc_sos_3x3_v2.tiff"
        );
    }

    #[test]
    fn test_present_calendars_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        for (name, _) in calendar_urls() {
            std::fs::write(dir.path().join(name), b"tiff").unwrap();
        }
        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let outcomes = fetcher.crop_calendars(dir.path()).unwrap();
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes
            .iter()
            .all(|(_, outcome)| *outcome == Download::AlreadyPresent));
    }
}
