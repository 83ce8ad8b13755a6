//! Error types for the core generation crate.

use thiserror::Error;

/// Prompt rejected before any generation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// Prompt is empty after trimming.
    #[error("Prompt is required")]
    Empty,
    /// Prompt exceeds the character limit.
    #[error("Prompt is too long (max {max} characters)")]
    TooLong { len: usize, max: usize },
}

/// Why a single model call did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    /// Endpoint answered with a non-success status.
    #[error("API Error: {status} - {reason}")]
    Api { status: u16, reason: String },
    /// Response decoded but carried no image URL.
    #[error("No image URL found in response")]
    NoImageUrl,
    /// Network or decoding failure.
    #[error("{0}")]
    Transport(String),
}

/// Errors returned by orchestrator operations.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Prompt validation failed; nothing was recorded.
    #[error(transparent)]
    Validation(#[from] PromptError),
    /// Another attempt is still generating.
    #[error("a generation is already in progress")]
    Busy,
    /// Record id is unknown to the store.
    #[error("unknown record: {0}")]
    UnknownRecord(String),
    /// Only failed records can be retried.
    #[error("record {0} is not in an error state")]
    NotRetryable(String),
}
