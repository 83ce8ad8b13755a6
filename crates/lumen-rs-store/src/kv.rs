//! Key-value backends holding serialized text blobs.

use crate::error::StoreError;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Text blob storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Read a blob, `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replace a blob.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Remove a blob; missing keys are ignored.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local backend.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// File-backed store keeping one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    /// Directory holding the key files.
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a new file-backed store under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file key-value store (root={})", root.display());
        Ok(Self { root })
    }

    /// Path to the file for a key.
    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Path to the temporary file for a key.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json.tmp"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Write through a temp file and rename so readers never see a partial blob.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        let temp_path = self.temp_path(key);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        debug!("wrote key (key={}, bytes={})", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keys become file names, so only a conservative charset is allowed.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
