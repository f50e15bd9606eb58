use crate::options::BestImages as BestImagesArgs;
use anyhow::{Context, Result};
use log::info;
use scenes::{
    preview::{preview_hrefs, preview_html},
    CatalogConfig, Item, PlanetaryComputer, Selector,
};

impl BestImagesArgs {
    pub fn run(&self) -> Result<()> {
        let windows = self.season.windows()?;
        let config = self.catalog_config()?;
        let selector = Selector::from(&config);
        let catalog = PlanetaryComputer::new(config)?;

        let best = selector.select(&catalog, &windows, &self.tile, self.max_cloud_cover)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&best)?);
        } else {
            print_item("A", &best.a);
            print_item("B", &best.b);
            if let Ok((href_a, href_b)) = preview_hrefs(&best) {
                println!("preview A: {href_a}");
                println!("preview B: {href_b}");
            }
        }

        if let Some(path) = &self.html {
            std::fs::write(path, preview_html(&best)?)
                .with_context(|| format!("writing previews to {path:?}"))?;
            info!("wrote previews to {path:?}");
        }
        Ok(())
    }

    /// Config file values, then command line overrides.
    fn catalog_config(&self) -> Result<CatalogConfig> {
        let mut config = match &self.config {
            Some(path) => {
                CatalogConfig::load(path).with_context(|| format!("reading config {path:?}"))?
            }
            None => CatalogConfig::default(),
        };
        if let Some(url) = &self.stac_url {
            config.stac_url.clone_from(url);
        }
        if self.no_sign {
            config.sign_assets = false;
        }
        Ok(config)
    }
}

fn print_item(window: &str, item: &Item) {
    let date = item
        .date()
        .map_or_else(|| "unknown date".to_owned(), |d| d.to_string());
    println!(
        "window {window}: {} ({date}, {}% cloud cover)",
        item.id,
        item.cloud_cover()
    );
}

#[cfg(test)]
mod tests {
    use crate::options::{Cli, Command};
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"stac_url": "http://localhost:8080", "max_nodata": 5.0}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_owned();

        let parse = |extra: &[&str]| {
            let mut args = vec![
                "ftw",
                "best-images",
                "--tile",
                "33UUP",
                "--sos",
                "2020-03-10",
                "--eos",
                "2020-07-01",
                "--config",
                path.as_str(),
            ];
            args.extend_from_slice(extra);
            match Cli::try_parse_from(args).unwrap().cmd {
                Command::BestImages(args) => args.catalog_config().unwrap(),
                other => panic!("unexpected {other:?}"),
            }
        };

        let config = parse(&[]);
        assert_eq!(config.stac_url, "http://localhost:8080");
        assert_eq!(config.max_nodata, 5.0);
        assert!(config.sign_assets);

        let config = parse(&["--stac-url", "http://example.com/stac", "--no-sign"]);
        assert_eq!(config.stac_url, "http://example.com/stac");
        assert_eq!(config.max_nodata, 5.0);
        assert!(!config.sign_assets);
    }
}
