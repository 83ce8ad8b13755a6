//! Attempt lifecycle types: inputs, the observable state cell, and the
//! provisional record handed out while a call is in flight.

use log::warn;
use lumen_rs_protocol::{GenerationRecord, GenerationStatus};
use parking_lot::Mutex;
use std::sync::Arc;

/// User input for one generation attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationAttempt {
    /// Prompt as typed, before any style modifier.
    pub prompt: String,
    /// Style id; falls back to the stored default style.
    pub style: Option<String>,
    /// System prompt; falls back to the stored system prompt.
    pub system_prompt: Option<String>,
}

impl GenerationAttempt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Where the orchestrator is in the `idle -> generating -> completed | error` cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    /// Provisional record awaiting the model call.
    Generating(GenerationRecord),
    Completed(GenerationRecord),
    Error(GenerationRecord),
}

impl GenerationState {
    /// Record attached to the state, if any.
    pub fn record(&self) -> Option<&GenerationRecord> {
        match self {
            Self::Idle => None,
            Self::Generating(record) | Self::Completed(record) | Self::Error(record) => {
                Some(record)
            }
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating(_))
    }

    /// Terminal state matching the record's status.
    pub(crate) fn settled(record: GenerationRecord) -> Self {
        if record.status == GenerationStatus::Completed {
            Self::Completed(record)
        } else {
            Self::Error(record)
        }
    }
}

/// Provisional attempt: a `temp_*` record that has not been persisted yet.
///
/// Dropping an unresolved attempt returns the orchestrator to idle.
#[derive(Debug)]
pub struct PendingGeneration {
    record: GenerationRecord,
    final_prompt: String,
    system_prompt: Option<String>,
    state: Arc<Mutex<GenerationState>>,
    settled: bool,
}

impl PendingGeneration {
    pub(crate) fn new(
        record: GenerationRecord,
        final_prompt: String,
        system_prompt: Option<String>,
        state: Arc<Mutex<GenerationState>>,
    ) -> Self {
        Self {
            record,
            final_prompt,
            system_prompt,
            state,
            settled: false,
        }
    }

    /// Provisional record to show while the call runs.
    pub fn record(&self) -> &GenerationRecord {
        &self.record
    }

    /// Prompt sent to the model, style modifier included.
    pub fn final_prompt(&self) -> &str {
        &self.final_prompt
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Publish the terminal record and release the in-flight slot.
    pub(crate) fn settle(mut self, record: GenerationRecord) {
        *self.state.lock() = GenerationState::settled(record);
        self.settled = true;
    }
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.lock();
        if state.is_generating() {
            *state = GenerationState::Idle;
        }
        warn!(
            "pending generation dropped before resolving (id={})",
            self.record.id
        );
    }
}
