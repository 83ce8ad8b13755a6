//! Path resolution for config layer discovery.

use crate::ConfigError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Canonical form of the working directory. A missing directory is kept
/// as given so the loader can still fall back to defaults.
pub(super) fn resolve_cwd(cwd: &Path) -> Result<PathBuf, ConfigError> {
    cwd.canonicalize().or_else(|err| match err.kind() {
        ErrorKind::NotFound => Ok(cwd.to_path_buf()),
        _ => Err(ConfigError::Io(err)),
    })
}

/// Key used to skip a layer file that was already visited under another name.
pub(super) fn dedup_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Nearest ancestor of `cwd` holding one of `markers`.
pub(super) fn project_root(cwd: &Path, markers: &[String]) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}
