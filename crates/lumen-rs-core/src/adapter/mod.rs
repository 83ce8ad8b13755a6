//! Generation adapter: turns a final prompt into an image URL via an external model.

mod extract;
mod http;

pub use extract::{RegexUrlExtractor, UrlExtractor};
pub use http::HttpImageGenerator;

use crate::error::GenerationFailure;
use async_trait::async_trait;
use lumen_rs_protocol::now_millis;
use rand::Rng;

/// Prompt used by connection checks.
pub const CONNECTION_TEST_PROMPT: &str = "Test connection";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Outcome of one model call. The id is minted per call, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Adapter-issued record id.
    pub id: String,
    /// Image URL or the reason none was produced.
    pub result: Result<String, GenerationFailure>,
}

impl GenerationResponse {
    pub fn success(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            result: Ok(url.into()),
        }
    }

    pub fn failure(id: impl Into<String>, failure: GenerationFailure) -> Self {
        Self {
            id: id.into(),
            result: Err(failure),
        }
    }
}

/// Image generation backend. Failures are reported in the response, never raised.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for `prompt`, optionally prefixed by `system_prompt`.
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> GenerationResponse;

    /// Whether the backend is reachable and answering.
    async fn test_connection(&self) -> bool {
        self.generate(CONNECTION_TEST_PROMPT, None)
            .await
            .result
            .is_ok()
    }
}

/// Single message content: the system prompt, a blank line, then the prompt.
pub fn build_message(prompt: &str, system_prompt: Option<&str>) -> String {
    match system_prompt.filter(|system| !system.is_empty()) {
        Some(system) => format!("{system}\n\n{prompt}"),
        None => prompt.to_string(),
    }
}

/// Mint a fresh `img_<millis>_<9 base-36 chars>` id.
pub fn mint_generation_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("img_{}_{suffix}", now_millis())
}
