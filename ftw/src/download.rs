use crate::options::{DownloadCalendars, Hansen};
use anyhow::Result;
use fetch::{granule_codes_from_bbox, Download, Fetcher, HansenProduct};
use indicatif::MultiProgress;
use log::info;
use std::{path::PathBuf, time::Duration};

fn fetcher(timeout: u64) -> Result<Fetcher> {
    Ok(Fetcher::new(Duration::from_secs(timeout))?.with_progress(MultiProgress::new()))
}

fn report(outcomes: &[(PathBuf, Download)]) {
    for (path, outcome) in outcomes {
        match outcome {
            Download::Downloaded(bytes) => println!("{} ({bytes} bytes)", path.display()),
            Download::AlreadyPresent => println!("{} (already present)", path.display()),
        }
    }
}

impl DownloadCalendars {
    pub fn run(&self) -> Result<()> {
        let outcomes = fetcher(self.timeout)?.crop_calendars(&self.dir)?;
        report(&outcomes);
        Ok(())
    }
}

impl Hansen {
    pub fn run(&self) -> Result<()> {
        let product = HansenProduct {
            version: self.version.clone(),
            layer: self.layer.clone(),
        };
        let b = self.bbox;
        let codes = granule_codes_from_bbox(b.lat_min, b.lat_max, b.lon_min, b.lon_max);
        info!("{} granules cover the bounding box", codes.len());

        if !self.download {
            for code in codes {
                println!("{}", product.url(code));
            }
            return Ok(());
        }
        let outcomes = fetcher(self.timeout)?.hansen_granules(&product, &codes, &self.dir)?;
        report(&outcomes);
        Ok(())
    }
}
