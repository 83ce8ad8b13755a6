//! User-editable generation settings.

use serde::{Deserialize, Serialize};

/// Default instruction text prepended to prompts.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Generate a high-quality, detailed image based on the user's prompt. Focus on artistic composition, proper lighting, and visual appeal.";
/// Default style preset identifier.
pub const DEFAULT_STYLE_ID: &str = "photorealistic";
/// Default retention cap for stored records.
pub const DEFAULT_MAX_IMAGES: usize = 50;

/// Persisted settings record. Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub system_prompt: String,
    pub default_style: String,
    pub max_images: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            default_style: DEFAULT_STYLE_ID.to_string(),
            max_images: DEFAULT_MAX_IMAGES,
        }
    }
}

impl Settings {
    /// Retention cap used for eviction; never below one.
    pub fn retention_cap(&self) -> usize {
        self.max_images.max(1)
    }

    /// System prompt, or `None` when blank.
    pub fn system_prompt(&self) -> Option<&str> {
        Some(self.system_prompt.as_str()).filter(|prompt| !prompt.trim().is_empty())
    }

    /// Merge the present fields of a patch.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(system_prompt) = patch.system_prompt {
            self.system_prompt = system_prompt;
        }
        if let Some(default_style) = patch.default_style {
            self.default_style = default_style;
        }
        if let Some(max_images) = patch.max_images {
            self.max_images = max_images;
        }
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_images: Option<usize>,
}

impl SettingsPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.system_prompt.is_none() && self.default_style.is_none() && self.max_images.is_none()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            system_prompt: Some(settings.system_prompt),
            default_style: Some(settings.default_style),
            max_images: Some(settings.max_images),
        }
    }
}
