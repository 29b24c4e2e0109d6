use thiserror::Error;

/// Errors raised by the remote catalog, the local store and configuration loading
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The remote catalog could not be reached
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote catalog answered with a non-success status
    #[error("Remote catalog returned status {0}")]
    Status(u16),

    /// A response body could not be understood
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The local store failed to read or write
    #[error("Store failure: {0}")]
    Store(String),

    /// Filesystem error from a persisted store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted store contents are not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Recipe rejected before reaching the store
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),
}
