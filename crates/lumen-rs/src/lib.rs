//! Public SDK surface for Lumen.
//!
//! This crate re-exports the building blocks and provides helpers that wire
//! a loaded config into a store, a generator, and an orchestrator.

mod setup;

/// Re-export for convenience.
pub use lumen_rs_config as config;
pub use lumen_rs_core as core;
/// Re-export for convenience.
pub use lumen_rs_protocol as protocol;
pub use lumen_rs_server as server;
/// Re-export for convenience.
pub use lumen_rs_store as store;

pub use setup::{
    API_KEY_ENV, build_generator, build_orchestrator, download_file_name, export_file_name,
    open_store,
    resolve_api_key, store_root,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
