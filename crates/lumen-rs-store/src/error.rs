//! Error types for store operations.

/// Errors returned by key-value backends and the generation store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Import payload could not be used; nothing was changed.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Record would break the status invariant; nothing was changed.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// Key contains characters the backend cannot store.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}
