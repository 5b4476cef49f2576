//! Path resolution helpers.

use anyhow::Context;
use std::path::{Path, PathBuf};

/// Normalizes a path-like input to an absolute path.
///
/// Relative paths are resolved against the current directory. The path is
/// not required to exist.
pub fn resolve(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Resolves a path and validates that it exists, following symlinks.
pub fn resolve_existing(path: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let path = path.as_ref();
    std::fs::canonicalize(path)
        .with_context(|| format!("Path does not exist: {}", path.display()))
}
