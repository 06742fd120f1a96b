use modfetch_core::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A catalog backed by a fixed `(id, game version) -> url` table.
///
/// Serves both numeric and slug identifiers by their string form. Every lookup
/// is recorded; clones share the record.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    files: HashMap<(String, String), String>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(
        mut self,
        id: impl ToString,
        game_version: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        self.files
            .insert((id.to_string(), game_version.into()), url.into());
        self
    }

    /// Delays every lookup for `id`.
    pub fn with_delay(mut self, id: impl ToString, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    /// Recorded `(id, game version)` lookups in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    async fn lookup(&self, game_version: &str, id: String) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .push((id.clone(), game_version.to_string()));

        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }

        self.files.get(&(id, game_version.to_string())).cloned()
    }
}

impl CatalogProvider<u64> for StaticCatalog {
    async fn find_download_url(
        &self,
        game_version: &str,
        id: &u64,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.lookup(game_version, id.to_string()).await)
    }
}

impl CatalogProvider<str> for StaticCatalog {
    async fn find_download_url(
        &self,
        game_version: &str,
        id: &str,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.lookup(game_version, id.to_string()).await)
    }
}

/// A hasher returning preset digests.
///
/// Urls without a preset digest hash to `"sha256-<url>"`.
#[derive(Clone, Default)]
pub struct StaticHasher {
    hashes: HashMap<String, String>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(mut self, url: impl Into<String>, hash: impl Into<String>) -> Self {
        self.hashes.insert(url.into(), hash.into());
        self
    }

    /// Makes hashing `url` fail as if the prefetch exited nonzero.
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// Hashed urls in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContentHasher for StaticHasher {
    async fn hash(&self, url: &str) -> Result<String, HashError> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(url) {
            return Err(HashError::Failed {
                url: url.to_string(),
                code: Some(1),
                stderr: "error: unable to download".to_string(),
            });
        }

        Ok(self
            .hashes
            .get(url)
            .cloned()
            .unwrap_or_else(|| format!("sha256-{url}")))
    }
}
