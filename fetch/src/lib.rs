//! Fetch auxiliary rasters over HTTP, skipping files already on disk.

pub mod calendars;
mod error;
pub mod hansen;
mod progress;

pub use crate::{
    error::FetchError,
    hansen::{granule_codes_from_bbox, GranuleCode, HansenProduct},
};
use indicatif::MultiProgress;
use log::{debug, info};
use reqwest::blocking::Client;
use std::{
    ffi::OsString,
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

/// What [`Fetcher::fetch_if_absent`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Download {
    /// File was fetched; carries the number of bytes written.
    Downloaded(u64),
    /// File existed and was left untouched.
    AlreadyPresent,
}

/// Blocking HTTP downloader.
pub struct Fetcher {
    client: Client,

    /// Where to draw per-file progress bars, if anywhere.
    progress: Option<MultiProgress>,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            progress: None,
        })
    }

    /// Draw a progress bar for each download in `group`.
    #[must_use]
    pub fn with_progress(mut self, group: MultiProgress) -> Self {
        self.progress = Some(group);
        self
    }

    /// Downloads `url` to `path` unless `path` already exists.
    ///
    /// Parent directories are created as needed. Data is written to a
    /// sibling `.part` file and moved into place once complete, so an
    /// interrupted download never leaves a truncated `path` behind.
    pub fn fetch_if_absent(&self, url: &str, path: &Path) -> Result<Download, FetchError> {
        if path.exists() {
            debug!("{path:?} already present");
            return Ok(Download::AlreadyPresent);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!("downloading {url}");
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_owned(),
            });
        }

        let part = part_path(path);
        let file = File::create(&part)?;
        let res = match &self.progress {
            Some(group) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let pb = group.add(progress::bar(name, response.content_length()));
                let res = response.copy_to(&mut pb.wrap_write(file));
                pb.finish();
                res
            }
            None => {
                let mut file = file;
                response.copy_to(&mut file)
            }
        };
        let written = match res {
            Ok(n) => n,
            Err(e) => {
                let _ = std::fs::remove_file(&part);
                return Err(e.into());
            }
        };
        promote(&part, path)?;
        debug!("wrote {written} bytes to {path:?}");
        Ok(Download::Downloaded(written))
    }
}

/// Moves a finished `part` file to `path`. `part` is removed if the
/// move fails.
fn promote(part: &Path, path: &Path) -> Result<(), FetchError> {
    std::fs::rename(part, path).map_err(|e| {
        let _ = std::fs::remove_file(part);
        e.into()
    })
}

/// Returns `path` with `.part` appended.
fn part_path(path: &Path) -> PathBuf {
    let mut part = OsString::from(path.as_os_str());
    part.push(".part");
    PathBuf::from(part)
}
