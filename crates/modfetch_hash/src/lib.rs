//! # modfetch hashers
//!
//! [`ContentHasher`] implementations used to pin downloads in the manifest.
//!
//! * [`PrefetchHasher`] shells out to `nix-prefetch-url`, which downloads the
//!   url into the nix store and prints its base32 sha256.
//! * [`Sha256Hasher`] downloads the url itself and returns the hex sha256,
//!   for machines without nix installed.

use modfetch_core::prelude::*;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

mod sha256;

pub use sha256::Sha256Hasher;

pub const DEFAULT_PREFETCH_PROGRAM: &str = "nix-prefetch-url";

#[derive(Clone, Debug)]
pub struct PrefetchConfig {
    /// Program invoked with the url as its last argument.
    ///
    /// Defaults to [`DEFAULT_PREFETCH_PROGRAM`].
    pub program: String,
    /// Extra arguments placed before the url.
    pub args: Vec<String>,
    /// Upper bound for a single invocation. The child is killed when exceeded.
    ///
    /// Defaults to 5 minutes.
    pub timeout: Duration,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PREFETCH_PROGRAM.to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PrefetchHasher {
    config: PrefetchConfig,
}

impl PrefetchHasher {
    pub fn new(config: PrefetchConfig) -> Self {
        Self { config }
    }
}

/// Removes every line break from the prefetch output.
fn digest_from_output(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout).replace(['\n', '\r'], "")
}

impl ContentHasher for PrefetchHasher {
    async fn hash(&self, url: &str) -> Result<String, HashError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Executing: {command:?}");

        let output = tokio::time::timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| HashError::Timeout {
                url: url.to_string(),
                secs: self.config.timeout.as_secs(),
            })??;

        if !output.status.success() {
            return Err(HashError::Failed {
                url: url.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let digest = digest_from_output(&output.stdout);
        if digest.is_empty() {
            return Err(HashError::Empty(url.to_string()));
        }

        Ok(digest)
    }
}
