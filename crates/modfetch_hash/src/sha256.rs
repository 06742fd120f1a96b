use futures::StreamExt;
use modfetch_core::prelude::*;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

/// Downloads a url and hashes its body with sha256.
#[derive(Clone)]
pub struct Sha256Hasher {
    client: Client,
}

impl Sha256Hasher {
    pub fn new(timeout: Duration) -> Result<Self, HashError> {
        let client = Client::builder()
            .user_agent(concat!("modfetch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| HashError::Download(e.to_string()))?;

        Ok(Self { client })
    }
}

impl ContentHasher for Sha256Hasher {
    async fn hash(&self, url: &str) -> Result<String, HashError> {
        debug!("Downloading {url} for hashing");

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HashError::Download(format!("{url}: {e}")))?;

        if !res.status().is_success() {
            return Err(HashError::Download(format!(
                "{url}: server returned {}",
                res.status()
            )));
        }

        let mut hasher = Sha256::new();
        let mut stream = res.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| HashError::Download(format!("{url}: {e}")))?;
            hasher.update(&chunk);
        }

        Ok(hex::encode(hasher.finalize()))
    }
}
