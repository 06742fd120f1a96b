//! # modfetch CurseForge provider
//!
//! Looks up mod files by numeric project id on a CurseForge style catalog.
//!
//! The catalog is asked for the complete file list of a project. Files are
//! ordered newest first by their catalog id, so when several files claim the
//! same game version the most recently published one wins.
//!
//! ## Usage
//!
//! ```no_run
//! use modfetch_curseforge::{CurseForgeClient, CurseForgeConfig};
//!
//! let client = CurseForgeClient::new(CurseForgeConfig::default()).unwrap();
//! ```

use modfetch_core::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://addons-ecs.forgesvc.net/api/v2";

#[derive(Clone, Debug)]
pub struct CurseForgeConfig {
    /// Catalog api root.
    ///
    /// Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Per request timeout.
    ///
    /// Defaults to 30 seconds.
    pub timeout: Duration,
}

impl Default for CurseForgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

// Only the fields used for resolution.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CurseForgeFile {
    id: u64,
    game_version: Vec<String>,
    download_url: String,
}

#[derive(Clone)]
pub struct CurseForgeClient {
    client: Client,
    base_url: String,
}

impl CurseForgeClient {
    pub fn new(config: CurseForgeConfig) -> Result<Self, ProviderError> {
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

    async fn fetch_files(&self, id: u64) -> Result<Vec<CurseForgeFile>, ProviderError> {
        let url = format!("{}/addon/{id}/files", self.base_url);
        debug!("Fetching CurseForge files from {url}");

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

        res.json::<Vec<CurseForgeFile>>()
            .await
            .map_err(|e| ProviderError::Decode {
                url,
                reason: e.to_string(),
            })
    }
}

fn newest_for_version(mut files: Vec<CurseForgeFile>, game_version: &str) -> Option<String> {
    files.sort_by(|a, b| b.id.cmp(&a.id));
    files
        .into_iter()
        .find(|f| f.game_version.iter().any(|v| v == game_version))
        .map(|f| f.download_url)
}

impl CatalogProvider<u64> for CurseForgeClient {
    async fn find_download_url(
        &self,
        game_version: &str,
        id: &u64,
    ) -> Result<Option<String>, ProviderError> {
        let files = self.fetch_files(*id).await?;
        Ok(newest_for_version(files, game_version))
    }
}
