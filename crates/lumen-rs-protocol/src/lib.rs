//! Wire protocol types for Lumen records, settings, snapshots, and the HTTP API.

mod api;
mod record;
mod settings;
mod snapshot;

pub use api::{GenerateRequest, GenerateResponse};
pub use record::{Dimensions, GenerationRecord, GenerationStatus, RecordPatch, now_millis};
pub use settings::{
    DEFAULT_MAX_IMAGES, DEFAULT_STYLE_ID, DEFAULT_SYSTEM_PROMPT, Settings, SettingsPatch,
};
pub use snapshot::Snapshot;
