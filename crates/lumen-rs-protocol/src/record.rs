//! Generation record model and its status lifecycle.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Lifecycle status of a generation record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Request submitted, waiting on the model.
    Generating,
    /// Model returned an image URL.
    Completed,
    /// Attempt failed after entering generation.
    Error,
}

impl GenerationStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Generating => "generating",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Error => "error",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for GenerationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "generating" => Ok(GenerationStatus::Generating),
            "completed" => Ok(GenerationStatus::Completed),
            "error" => Ok(GenerationStatus::Error),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Pixel dimensions of a generated image, when known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One user-initiated generation attempt and its outcome.
///
/// A record holds a `url` only when completed and an `error` only when
/// failed; a generating record holds neither. [`GenerationRecord::normalized`]
/// drops contradicting fields and [`GenerationRecord::validate`] rejects a
/// terminal record that lacks its payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRecord {
    /// Record identifier (`temp_*` while provisional).
    pub id: String,
    /// Final prompt sent to the model.
    pub prompt: String,
    /// Optional style preset identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    /// Lifecycle status.
    pub status: GenerationStatus,
    /// Image location, completed records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Failure reason, error records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional image dimensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl GenerationRecord {
    /// Create a provisional record in the generating state.
    pub fn generating(prompt: impl Into<String>, style: Option<String>, timestamp: i64) -> Self {
        Self {
            id: format!("temp_{timestamp}"),
            prompt: prompt.into(),
            style,
            timestamp,
            status: GenerationStatus::Generating,
            url: None,
            error: None,
            dimensions: None,
        }
    }

    /// Move to the completed state under the issued id.
    pub fn completed(self, id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: GenerationStatus::Completed,
            url: Some(url.into()),
            error: None,
            ..self
        }
    }

    /// Move to the error state under the issued id.
    pub fn failed(self, id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: GenerationStatus::Error,
            url: None,
            error: Some(error.into()),
            ..self
        }
    }

    /// Whether the id is still the client-side placeholder.
    pub fn is_provisional(&self) -> bool {
        self.id.starts_with("temp_")
    }

    /// Drop fields that contradict the status and blank optional strings.
    pub fn normalized(mut self) -> Self {
        self.url = self.url.filter(|url| !url.is_empty());
        self.error = self.error.filter(|error| !error.is_empty());
        self.style = self.style.filter(|style| !style.is_empty());
        match self.status {
            GenerationStatus::Generating => {
                self.url = None;
                self.error = None;
            }
            GenerationStatus::Completed => self.error = None,
            GenerationStatus::Error => self.url = None,
        }
        self
    }

    /// Check that a completed record has a url and a failed one has an error.
    pub fn validate(&self) -> Result<(), String> {
        match self.status {
            GenerationStatus::Completed if self.url.is_none() => {
                Err(format!("completed record {} has no url", self.id))
            }
            GenerationStatus::Error if self.error.is_none() => {
                Err(format!("error record {} has no error message", self.id))
            }
            _ => Ok(()),
        }
    }
}

/// Partial update merged onto a stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordPatch {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub status: Option<GenerationStatus>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl RecordPatch {
    /// Patch that marks a record completed at `url`.
    pub fn completed(url: impl Into<String>) -> Self {
        Self {
            status: Some(GenerationStatus::Completed),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Patch that marks a record failed with `error`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(GenerationStatus::Error),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Merge present fields onto the record, then normalize it.
    pub fn apply(self, record: GenerationRecord) -> GenerationRecord {
        GenerationRecord {
            id: record.id,
            prompt: self.prompt.unwrap_or(record.prompt),
            style: self.style.or(record.style),
            timestamp: self.timestamp.unwrap_or(record.timestamp),
            status: self.status.unwrap_or(record.status),
            url: self.url.or(record.url),
            error: self.error.or(record.error),
            dimensions: self.dimensions.or(record.dimensions),
        }
        .normalized()
    }
}
