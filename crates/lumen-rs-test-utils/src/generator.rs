use async_trait::async_trait;
use lumen_rs_core::{GenerationFailure, GenerationResponse, ImageGenerator, mint_generation_id};
use parking_lot::Mutex;
use std::sync::Arc;

/// Always succeeds with the same URL.
#[derive(Debug, Clone)]
pub struct FixedGenerator {
    url: String,
}

impl FixedGenerator {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ImageGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str, _system_prompt: Option<&str>) -> GenerationResponse {
        GenerationResponse::success(mint_generation_id(), self.url.clone())
    }
}

/// Always fails with the same reason.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    failure: GenerationFailure,
}

impl FailingGenerator {
    pub fn new(failure: GenerationFailure) -> Self {
        Self { failure }
    }

    pub fn no_image_url() -> Self {
        Self::new(GenerationFailure::NoImageUrl)
    }
}

#[async_trait]
impl ImageGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _system_prompt: Option<&str>) -> GenerationResponse {
        GenerationResponse::failure(mint_generation_id(), self.failure.clone())
    }
}

/// Arguments of one `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub system_prompt: Option<String>,
}

/// Replays scripted outcomes in order and records every call.
///
/// Once the script runs out the last outcome repeats.
#[derive(Debug, Clone)]
pub struct RecordingGenerator {
    script: Arc<Mutex<Vec<Result<String, GenerationFailure>>>>,
    last: Arc<Mutex<Result<String, GenerationFailure>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingGenerator {
    pub fn new(outcomes: Vec<Result<String, GenerationFailure>>) -> Self {
        let last = outcomes
            .last()
            .cloned()
            .unwrap_or(Err(GenerationFailure::NoImageUrl));
        let mut script = outcomes;
        script.reverse();
        Self {
            script: Arc::new(Mutex::new(script)),
            last: Arc::new(Mutex::new(last)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Succeed every time with `url`.
    pub fn succeeding(url: impl Into<String>) -> Self {
        Self::new(vec![Ok(url.into())])
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> GenerationResponse {
        self.calls.lock().push(RecordedCall {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.map(str::to_string),
        });
        let outcome = match self.script.lock().pop() {
            Some(outcome) => {
                *self.last.lock() = outcome.clone();
                outcome
            }
            None => self.last.lock().clone(),
        };
        GenerationResponse {
            id: mint_generation_id(),
            result: outcome,
        }
    }
}
