use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build catalog client: {0}")]
    Client(String),

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Catalog returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode catalog response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to start hasher: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Hasher exited with {code:?} for {url}: {stderr}")]
    Failed {
        url: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Hasher produced no digest for {0}")]
    Empty(String),

    #[error("Hasher timed out after {secs}s for {url}")]
    Timeout { url: String, secs: u64 },

    #[error("Download error: {0}")]
    Download(String),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("unknown mod '{name}': no file found for game version {version}")]
    UnknownMod { name: String, version: String },

    #[error("Invalid identifier '{value}' for mod '{name}'")]
    InvalidIdentifier { name: String, value: String },

    #[error("Catalog lookup failed for mod '{name}': {source}")]
    Provider {
        name: String,
        #[source]
        source: ProviderError,
    },

    #[error("Hashing failed for mod '{name}': {source}")]
    Hash {
        name: String,
        #[source]
        source: HashError,
    },
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid mod list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate mod name: {0}")]
    DuplicateName(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
