//! Microsoft Planetary Computer STAC client.

use crate::{
    catalog::{Catalog, CatalogConfig, SearchQuery},
    item::Item,
    ScenesError,
};
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{
    blocking::{Client, RequestBuilder},
    Url,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::time::Duration;

/// Host suffix of assets that need a SAS token to download.
const BLOB_STORAGE_SUFFIX: &str = ".blob.core.windows.net";

/// Blocking STAC API client.
pub struct PlanetaryComputer {
    client: Client,
    config: CatalogConfig,
}

/// Short lived shared access signature for one collection's storage.
#[derive(Debug, Clone, Deserialize)]
pub struct SasToken {
    pub token: String,

    #[serde(rename = "msft:expiry", default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl PlanetaryComputer {
    pub fn new(config: CatalogConfig) -> Result<Self, ScenesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("scenes/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetches a SAS token for `collection`.
    pub fn sas_token(&self, collection: &str) -> Result<SasToken, ScenesError> {
        let url = format!(
            "{}/token/{collection}",
            self.config.sas_url.trim_end_matches('/')
        );
        self.send(self.client.get(&url), &url)
    }
}

impl Catalog for PlanetaryComputer {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, ScenesError> {
        let mut page = Page::Post {
            url: format!("{}/search", self.config.stac_url.trim_end_matches('/')),
            body: query.body(),
        };
        let mut items = Vec::new();

        loop {
            let collection: ItemCollection = match &page {
                Page::Post { url, body } => self.send(self.client.post(url).json(body), url)?,
                Page::Get { url } => self.send(self.client.get(url), url)?,
            };
            debug!(
                "{} items from {}",
                collection.features.len(),
                page.url()
            );
            if collection.features.is_empty() {
                break;
            }
            items.extend(collection.features);
            match page.next(&collection.links) {
                Some(next) => page = next,
                None => break,
            }
        }

        if self.config.sign_assets && !items.is_empty() {
            let token = self.sas_token(&query.collection)?;
            for item in &mut items {
                sign_item(item, &token.token);
            }
        }

        Ok(items)
    }
}

/// Private API.
impl PlanetaryComputer {
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T, ScenesError> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScenesError::Status {
                status,
                url: url.to_owned(),
            });
        }
        Ok(response.json()?)
    }
}

/// Appends `token` to every blob storage asset href of `item` that
/// isn't already signed.
pub fn sign_item(item: &mut Item, token: &str) {
    for asset in item.assets.values_mut() {
        if is_blob_storage(&asset.href) && !asset.href.contains('?') {
            asset.href = format!("{}?{token}", asset.href);
        }
    }
}

fn is_blob_storage(href: &str) -> bool {
    Url::parse(href)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.ends_with(BLOB_STORAGE_SUFFIX)))
        .unwrap_or(false)
}

#[derive(Debug, Deserialize)]
struct ItemCollection {
    #[serde(default)]
    features: Vec<Item>,

    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Clone, Deserialize)]
struct Link {
    rel: String,
    href: String,

    #[serde(default)]
    method: Option<String>,

    #[serde(default)]
    body: Option<Value>,

    /// Merge `body` into the previous request body instead of
    /// replacing it.
    #[serde(default)]
    merge: bool,
}

/// A single search result page request.
#[derive(Debug, Clone, PartialEq)]
enum Page {
    Post { url: String, body: Value },
    Get { url: String },
}

impl Page {
    fn url(&self) -> &str {
        match self {
            Self::Post { url, .. } | Self::Get { url } => url,
        }
    }

    /// Returns the request for the page after this one, if `links`
    /// has one.
    fn next(&self, links: &[Link]) -> Option<Self> {
        let link = links.iter().find(|l| l.rel == "next")?;
        let is_post = link
            .method
            .as_deref()
            .map_or(false, |m| m.eq_ignore_ascii_case("POST"));
        if !is_post {
            return Some(Self::Get {
                url: link.href.clone(),
            });
        }
        let previous = match self {
            Self::Post { body, .. } => body.clone(),
            Self::Get { .. } => Value::Object(serde_json::Map::new()),
        };
        let body = match (&link.body, link.merge) {
            (Some(body), true) => merge(previous, body),
            (Some(body), false) => body.clone(),
            (None, _) => previous,
        };
        Some(Self::Post {
            url: link.href.clone(),
            body,
        })
    }
}

/// Overlays `overlay`'s top level keys onto `base`.
fn merge(base: Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (k, v) in overlay {
                base.insert(k.clone(), v.clone());
            }
            Value::Object(base)
        }
        (_, overlay) => overlay.clone(),
    }
}
