//! Locating an image URL inside free-form model output.

use regex::Regex;
use std::sync::LazyLock;

/// First http(s) URL ending in a common image extension.
static IMAGE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[^\s]+\.(jpg|jpeg|png|gif|webp)").expect("valid image url pattern")
});

/// Pulls an image location out of model response text.
pub trait UrlExtractor: Send + Sync {
    /// Return the first image URL in `text`, if any.
    fn extract(&self, text: &str) -> Option<String>;
}

/// Regex-backed extractor; the default matches common image file URLs.
#[derive(Debug, Clone)]
pub struct RegexUrlExtractor {
    pattern: Regex,
}

impl RegexUrlExtractor {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Default for RegexUrlExtractor {
    fn default() -> Self {
        Self::new(IMAGE_URL_PATTERN.clone())
    }
}

impl UrlExtractor for RegexUrlExtractor {
    fn extract(&self, text: &str) -> Option<String> {
        self.pattern
            .find(text)
            .map(|found| found.as_str().to_string())
    }
}
