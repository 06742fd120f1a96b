//! # modfetch Modrinth provider
//!
//! Looks up mod versions by project slug on a Modrinth style catalog.
//!
//! Versions are taken in the order the catalog returns them. The first version
//! tagged with the requested game version wins and its first file is used.

use modfetch_core::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.modrinth.com/api/v1";

#[derive(Clone, Debug)]
pub struct ModrinthConfig {
    /// Catalog api root.
    ///
    /// Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Per request timeout.
    ///
    /// Defaults to 30 seconds.
    pub timeout: Duration,
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
struct ModrinthVersion {
    id: String,
    game_versions: Vec<String>,
    files: Vec<ModrinthFile>,
}

#[derive(Deserialize, Debug, Clone)]
struct ModrinthFile {
    url: String,
}

#[derive(Clone)]
pub struct ModrinthClient {
    client: Client,
    base_url: String,
}

impl ModrinthClient {
    pub fn new(config: ModrinthConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("modfetch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_versions(&self, slug: &str) -> Result<Vec<ModrinthVersion>, ProviderError> {
        let url = format!("{}/mod/{slug}/version", self.base_url);
        debug!("Fetching Modrinth versions from {url}");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        if !res.status().is_success() {
            return Err(ProviderError::Status {
                url,
                status: res.status().as_u16(),
            });
        }

        res.json::<Vec<ModrinthVersion>>()
            .await
            .map_err(|e| ProviderError::Decode {
                url,
                reason: e.to_string(),
            })
    }
}

fn first_for_version(versions: Vec<ModrinthVersion>, game_version: &str) -> Option<String> {
    versions
        .into_iter()
        .filter(|v| v.game_versions.iter().any(|g| g == game_version))
        .find_map(|v| {
            let url = v.files.into_iter().next().map(|f| f.url);
            if url.is_none() {
                warn!("Modrinth version {} has no files, skipping", v.id);
            }
            url
        })
}

impl CatalogProvider<str> for ModrinthClient {
    async fn find_download_url(
        &self,
        game_version: &str,
        slug: &str,
    ) -> Result<Option<String>, ProviderError> {
        let versions = self.fetch_versions(slug).await?;
        Ok(first_for_version(versions, game_version))
    }
}
