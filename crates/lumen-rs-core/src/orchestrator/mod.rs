//! Generation orchestrator.
//!
//! Drives one attempt at a time through `idle -> generating -> completed | error`:
//! validates the prompt, applies the style modifier, hands out a provisional
//! record, calls the [`ImageGenerator`], and persists the terminal record.

mod state;

pub use state::{GenerationAttempt, GenerationState, PendingGeneration};

use crate::adapter::ImageGenerator;
use crate::error::{OrchestratorError, PromptError};
use crate::styles;
use log::{debug, error, info, warn};
use lumen_rs_protocol::{GenerationRecord, GenerationStatus, SettingsPatch, now_millis};
use lumen_rs_store::GenerationStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Default prompt length limit in characters.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 1000;

/// Reject prompts that are blank or longer than `max_chars` characters.
pub fn validate_prompt(prompt: &str, max_chars: usize) -> Result<(), PromptError> {
    if prompt.trim().is_empty() {
        return Err(PromptError::Empty);
    }
    let len = prompt.chars().count();
    if len > max_chars {
        return Err(PromptError::TooLong {
            len,
            max: max_chars,
        });
    }
    Ok(())
}

/// Owns the lifecycle of generation attempts against one store.
pub struct Orchestrator {
    generator: Arc<dyn ImageGenerator>,
    store: GenerationStore,
    max_prompt_chars: usize,
    state: Arc<Mutex<GenerationState>>,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn ImageGenerator>, store: GenerationStore) -> Self {
        Self {
            generator,
            store,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            state: Arc::new(Mutex::new(GenerationState::Idle)),
        }
    }

    /// Override the prompt length limit.
    pub fn with_max_prompt_chars(mut self, max_prompt_chars: usize) -> Self {
        self.max_prompt_chars = max_prompt_chars;
        self
    }

    pub fn store(&self) -> &GenerationStore {
        &self.store
    }

    pub fn generator(&self) -> Arc<dyn ImageGenerator> {
        self.generator.clone()
    }

    pub fn max_prompt_chars(&self) -> usize {
        self.max_prompt_chars
    }

    /// Snapshot of the current lifecycle state.
    pub fn state(&self) -> GenerationState {
        self.state.lock().clone()
    }

    /// Validate an attempt and enter `generating`.
    ///
    /// The returned provisional record is not persisted. Validation failures
    /// leave the state and the store untouched.
    pub fn submit(&self, attempt: GenerationAttempt) -> Result<PendingGeneration, OrchestratorError> {
        if let Err(err) = validate_prompt(&attempt.prompt, self.max_prompt_chars) {
            debug!(
                "rejected prompt (len={}, reason={err})",
                attempt.prompt.chars().count()
            );
            return Err(err.into());
        }

        let settings = self.store.settings();
        let style = attempt
            .style
            .filter(|style| !style.trim().is_empty())
            .unwrap_or_else(|| settings.default_style.clone());
        let system_prompt = attempt
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .or_else(|| settings.system_prompt().map(str::to_string));
        let final_prompt = styles::final_prompt(&attempt.prompt, Some(&style));

        let mut state = self.state.lock();
        if state.is_generating() {
            return Err(OrchestratorError::Busy);
        }
        let record = GenerationRecord::generating(final_prompt.clone(), Some(style), now_millis());
        *state = GenerationState::Generating(record.clone());
        drop(state);

        info!(
            "generation started (id={}, style={}, prompt_len={})",
            record.id,
            record.style.as_deref().unwrap_or_default(),
            final_prompt.len()
        );
        Ok(PendingGeneration::new(
            record,
            final_prompt,
            system_prompt,
            self.state.clone(),
        ))
    }

    /// Run the model call for a pending attempt and persist the terminal record.
    pub async fn resolve(&self, pending: PendingGeneration) -> GenerationRecord {
        let response = self
            .generator
            .generate(pending.final_prompt(), pending.system_prompt())
            .await;
        let provisional = pending.record().clone();
        let record = match response.result {
            Ok(url) => provisional.completed(response.id, url),
            Err(failure) => provisional.failed(response.id, failure.to_string()),
        };

        if let Err(err) = self.store.save(record.clone()) {
            warn!("failed to persist generation (id={}, error={err})", record.id);
        }
        if record.status == GenerationStatus::Completed {
            info!("generation completed (id={})", record.id);
            let patch = SettingsPatch {
                system_prompt: pending.system_prompt().map(str::to_string),
                default_style: record
                    .style
                    .as_deref()
                    .filter(|style| styles::lookup(style).is_some())
                    .map(str::to_string),
                max_images: None,
            };
            if let Err(err) = self.store.save_settings(patch) {
                warn!("failed to save last-used settings (error={err})");
            }
        } else {
            error!(
                "generation failed (id={}, error={})",
                record.id,
                record.error.as_deref().unwrap_or_default()
            );
        }

        pending.settle(record.clone());
        record
    }

    /// Submit and resolve in one step.
    pub async fn generate(
        &self,
        attempt: GenerationAttempt,
    ) -> Result<GenerationRecord, OrchestratorError> {
        let pending = self.submit(attempt)?;
        Ok(self.resolve(pending).await)
    }

    /// Attempt that reproduces a record's original prompt and style.
    pub fn retry_attempt(record: &GenerationRecord) -> GenerationAttempt {
        let prompt = styles::strip_modifier(&record.prompt, record.style.as_deref());
        GenerationAttempt {
            prompt: prompt.to_string(),
            style: record.style.clone(),
            system_prompt: None,
        }
    }

    /// Re-run a failed attempt; the failed record is replaced by the new outcome.
    pub async fn retry(&self, id: &str) -> Result<GenerationRecord, OrchestratorError> {
        let current = match &*self.state.lock() {
            GenerationState::Error(record) if record.id == id => Some(record.clone()),
            _ => None,
        };
        let failed = current
            .or_else(|| self.store.get_by_id(id))
            .ok_or_else(|| OrchestratorError::UnknownRecord(id.to_string()))?;
        if failed.status != GenerationStatus::Error {
            return Err(OrchestratorError::NotRetryable(id.to_string()));
        }

        info!("retrying generation (id={id})");
        let record = self.generate(Self::retry_attempt(&failed)).await?;
        if let Err(err) = self.store.delete(&failed.id) {
            warn!("failed to remove retried record (id={}, error={err})", failed.id);
        }
        Ok(record)
    }
}
