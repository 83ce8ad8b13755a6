//! Core generation primitives for Lumen.
//!
//! This crate owns the style catalog, the image generation adapter, and the
//! orchestrator that drives an attempt from prompt to stored record.

pub mod adapter;
pub mod error;
pub mod orchestrator;
pub mod styles;

/// Generation backends and URL extraction.
pub use adapter::{
    CONNECTION_TEST_PROMPT, GenerationResponse, HttpImageGenerator, ImageGenerator,
    RegexUrlExtractor, UrlExtractor, build_message, mint_generation_id,
};
/// Core error types.
pub use error::{GenerationFailure, OrchestratorError, PromptError};
/// Orchestrator facade and attempt lifecycle types.
pub use orchestrator::{
    DEFAULT_MAX_PROMPT_CHARS, GenerationAttempt, GenerationState, Orchestrator, PendingGeneration,
    validate_prompt,
};
/// Style catalog.
pub use styles::StylePreset;
