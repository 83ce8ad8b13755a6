//! Generation record and settings store.

use crate::error::StoreError;
use crate::kv::{InMemoryKeyValueStore, KeyValueStore};
use crate::query::{RecordQuery, RecordStats};
use log::{debug, info, warn};
use lumen_rs_protocol::{GenerationRecord, RecordPatch, Settings, SettingsPatch, Snapshot};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Key holding the record sequence, newest first.
pub const RECORDS_KEY: &str = "ai_generated_images";
/// Key holding the settings record.
pub const SETTINGS_KEY: &str = "ai_generation_settings";

/// What an import replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of records written, when the snapshot carried a record sequence.
    pub records: Option<usize>,
    /// Whether settings were merged from the snapshot.
    pub settings_merged: bool,
}

/// Persistent history of generation records plus user settings.
///
/// Reads never fail: missing or unreadable data yields an empty history
/// and default settings. Mutations are serialized within the process.
#[derive(Clone)]
pub struct GenerationStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for GenerationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStore").finish_non_exhaustive()
    }
}

impl GenerationStore {
    /// Create a store over the given backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create a store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    /// Insert a record at the head, evicting the oldest beyond the retention cap.
    pub fn save(&self, record: GenerationRecord) -> Result<(), StoreError> {
        let record = record.normalized();
        record.validate().map_err(StoreError::InvalidRecord)?;
        let _guard = self.write_lock.lock();
        let mut records = self.list();
        records.insert(0, record);
        let cap = self.settings().retention_cap();
        if records.len() > cap {
            debug!(
                "evicting oldest records (evicted={}, cap={})",
                records.len() - cap,
                cap
            );
            records.truncate(cap);
        }
        self.write_records(&records)
    }

    /// All records, newest first. Unreadable history reads as empty.
    pub fn list(&self) -> Vec<GenerationRecord> {
        let raw = match self.backend.get(RECORDS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("failed to read records (error={err})");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!("stored records are unreadable; treating as empty (error={err})");
                Vec::new()
            }
        }
    }

    /// First record with the given id.
    pub fn get_by_id(&self, id: &str) -> Option<GenerationRecord> {
        self.list().into_iter().find(|record| record.id == id)
    }

    /// Merge a patch onto the first record with `id`. Returns whether one was found.
    ///
    /// A patch whose result would be a completed record without a url, or a
    /// failed record without an error, is refused and nothing is written.
    pub fn update(&self, id: &str, patch: RecordPatch) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let mut records = self.list();
        let Some(slot) = records.iter_mut().find(|record| record.id == id) else {
            debug!("update skipped; record not found (id={id})");
            return Ok(false);
        };
        let patched = patch.apply(slot.clone());
        patched.validate().map_err(StoreError::InvalidRecord)?;
        *slot = patched;
        self.write_records(&records)?;
        Ok(true)
    }

    /// Remove every record with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let mut records = self.list();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records)?;
        debug!("deleted record (id={id})");
        Ok(true)
    }

    /// Remove all records. Settings are kept.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.backend.remove(RECORDS_KEY)?;
        info!("cleared generation history");
        Ok(())
    }

    /// Pretty-printed snapshot of all records and settings.
    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        let snapshot = Snapshot::new(self.list(), self.settings());
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replace records and merge settings from an exported snapshot.
    ///
    /// The whole blob is validated before anything is written, so a
    /// malformed snapshot leaves the store untouched.
    pub fn import_snapshot(&self, blob: &str) -> Result<ImportSummary, StoreError> {
        let value: Value = serde_json::from_str(blob)
            .map_err(|err| StoreError::MalformedInput(format!("invalid JSON: {err}")))?;
        let Value::Object(map) = value else {
            return Err(StoreError::MalformedInput(
                "snapshot must be a JSON object".to_string(),
            ));
        };

        let records = match map.get("records").or_else(|| map.get("images")) {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| {
                        let record = serde_json::from_value::<GenerationRecord>(item.clone())
                            .map_err(|err| format!("invalid record: {err}"))?
                            .normalized();
                        record.validate()?;
                        Ok(record)
                    })
                    .collect::<Result<Vec<_>, String>>()
                    .map_err(StoreError::MalformedInput)?,
            ),
            _ => None,
        };
        let patch = match map.get("settings") {
            Some(settings @ Value::Object(_)) => Some(
                serde_json::from_value::<SettingsPatch>(settings.clone()).map_err(|err| {
                    StoreError::MalformedInput(format!("invalid settings: {err}"))
                })?,
            ),
            _ => None,
        };

        let _guard = self.write_lock.lock();
        let mut summary = ImportSummary::default();
        let previous = match &records {
            Some(_) => Some(self.backend.get(RECORDS_KEY)?),
            None => None,
        };
        if let Some(records) = records {
            self.write_records(&records)?;
            summary.records = Some(records.len());
        }
        if let Some(patch) = patch {
            if let Err(err) = self.merge_settings(patch) {
                if let Some(previous) = previous {
                    self.restore_records(previous);
                }
                return Err(err);
            }
            summary.settings_merged = true;
        }
        info!(
            "imported snapshot (records={:?}, settings_merged={})",
            summary.records, summary.settings_merged
        );
        Ok(summary)
    }

    /// Stored settings merged over defaults.
    pub fn settings(&self) -> Settings {
        let raw = match self.backend.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(err) => {
                warn!("failed to read settings (error={err})");
                return Settings::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("stored settings are unreadable; using defaults (error={err})");
                Settings::default()
            }
        }
    }

    /// Merge a partial update into the stored settings and return the result.
    pub fn save_settings(&self, patch: SettingsPatch) -> Result<Settings, StoreError> {
        let _guard = self.write_lock.lock();
        self.merge_settings(patch)
    }

    /// Records matching a query.
    pub fn query(&self, query: &RecordQuery) -> Vec<GenerationRecord> {
        query.apply(self.list())
    }

    /// Summary counts over the stored history.
    pub fn stats(&self) -> RecordStats {
        RecordStats::collect(&self.list())
    }

    fn merge_settings(&self, patch: SettingsPatch) -> Result<Settings, StoreError> {
        let mut settings = self.settings();
        settings.merge(patch);
        self.backend
            .set(SETTINGS_KEY, &serde_json::to_string(&settings)?)?;
        debug!("saved settings (max_images={})", settings.max_images);
        Ok(settings)
    }

    /// Put back the records blob seen before a failed import.
    fn restore_records(&self, previous: Option<String>) {
        let restored = match previous {
            Some(raw) => self.backend.set(RECORDS_KEY, &raw),
            None => self.backend.remove(RECORDS_KEY),
        };
        match restored {
            Ok(()) => warn!("import rolled back; settings write failed"),
            Err(err) => warn!("failed to roll back records after import (error={err})"),
        }
    }

    fn write_records(&self, records: &[GenerationRecord]) -> Result<(), StoreError> {
        self.backend
            .set(RECORDS_KEY, &serde_json::to_string(records)?)?;
        debug!("wrote records (count={})", records.len());
        Ok(())
    }
}
