//! Local persistence for generation records and settings.
//!
//! Records and settings live as two named JSON blobs in a [`KeyValueStore`];
//! [`GenerationStore`] layers capacity eviction, partial updates, export,
//! import, and history queries on top.

pub mod error;
pub mod kv;
pub mod query;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// Key-value backends.
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
/// History filtering and statistics.
pub use query::{RecordQuery, RecordStats, SortOrder};
/// Record and settings store.
pub use store::{GenerationStore, ImportSummary, RECORDS_KEY, SETTINGS_KEY};
