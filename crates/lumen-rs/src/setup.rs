//! Wiring from a loaded config to runtime components.

use chrono::NaiveDate;
use directories::BaseDirs;
use log::{debug, info};
use lumen_rs_config::{LumenConfig, ProviderConfig, StorageConfig, StorageProvider};
use lumen_rs_core::{HttpImageGenerator, ImageGenerator, Orchestrator};
use lumen_rs_store::{FileKeyValueStore, GenerationStore, StoreError};
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "LUMEN_API_KEY";
/// Store directory relative to the home directory.
const DEFAULT_STORE_DIR: &str = ".lumen/store";

/// Directory used by the file-backed store.
pub fn store_root(config: &StorageConfig) -> PathBuf {
    if let Some(path) = config.path.as_deref().filter(|path| !path.trim().is_empty()) {
        return PathBuf::from(path);
    }
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_STORE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
}

/// Open the generation store described by the config.
pub fn open_store(config: &LumenConfig) -> Result<GenerationStore, StoreError> {
    match config.storage.provider {
        StorageProvider::Memory => {
            info!("using in-memory store");
            Ok(GenerationStore::in_memory())
        }
        StorageProvider::File => {
            let root = store_root(&config.storage);
            let backend = FileKeyValueStore::new(&root)?;
            Ok(GenerationStore::new(Arc::new(backend)))
        }
    }
}

/// API key from the config, falling back to `env_value`.
pub fn resolve_api_key(config: &ProviderConfig, env_value: Option<String>) -> Option<String> {
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| env_value.filter(|key| !key.trim().is_empty()))
}

/// HTTP generator for the configured provider.
pub fn build_generator(config: &LumenConfig) -> HttpImageGenerator {
    let mut provider = config.provider.clone();
    provider.api_key = resolve_api_key(&provider, std::env::var(API_KEY_ENV).ok());
    debug!(
        "building generator (endpoint={}, model={}, api_key_set={})",
        provider.endpoint,
        provider.model,
        provider.api_key.is_some()
    );
    HttpImageGenerator::from_config(&provider)
}

/// Orchestrator over `generator` and `store` using the configured prompt limit.
pub fn build_orchestrator(
    config: &LumenConfig,
    generator: Arc<dyn ImageGenerator>,
    store: GenerationStore,
) -> Orchestrator {
    Orchestrator::new(generator, store).with_max_prompt_chars(config.generation.max_prompt_chars)
}

/// Default export file name for a given day.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("ai-images-export-{}.json", date.format("%Y-%m-%d"))
}

/// Default file name for a downloaded image.
pub fn download_file_name(id: &str) -> String {
    format!("ai-generated-{id}.jpg")
}
