//! Export document holding every record and the settings.

use crate::{GenerationRecord, Settings};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Serialized export of all records and settings.
///
/// Older exports named the fields `images` and `exportDate`; both are
/// accepted when reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(alias = "images")]
    pub records: Vec<GenerationRecord>,
    pub settings: Settings,
    #[serde(alias = "exportDate")]
    pub export_timestamp: String,
}

impl Snapshot {
    /// Build a snapshot stamped with the current time.
    pub fn new(records: Vec<GenerationRecord>, settings: Settings) -> Self {
        Self {
            records,
            settings,
            export_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
