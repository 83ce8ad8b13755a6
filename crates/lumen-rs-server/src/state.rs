use lumen_rs_core::{DEFAULT_MAX_PROMPT_CHARS, ImageGenerator};
use std::sync::Arc;

/// Shared handler state. The route keeps no per-request state.
#[derive(Clone)]
pub struct AppState {
    /// Model backend the generate route forwards to.
    pub generator: Arc<dyn ImageGenerator>,
    /// Prompt length limit in characters.
    pub max_prompt_chars: usize,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            generator,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }

    pub fn with_max_prompt_chars(mut self, max_prompt_chars: usize) -> Self {
        self.max_prompt_chars = max_prompt_chars;
        self
    }
}
