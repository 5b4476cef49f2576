//! Crate-wide constants.
//!
//! Centralized values to avoid magic strings throughout the codebase.

/// Remote used when the caller does not name one.
pub const DEFAULT_REMOTE: &str = "origin";

/// Literal printed by `rev-parse --abbrev-ref HEAD` when HEAD is detached.
pub const DETACHED_HEAD: &str = "HEAD";

/// Sentinel echoed by the quiet-diff shell fallback when a diff is non-empty.
///
/// The dirty-state probes compare captured stdout against this token instead
/// of propagating the diff exit code through a shell pipeline.
pub const CHANGED_SENTINEL: &str = "CHANGED";

/// Git directory entry used to detect an initialized repository root.
pub const GIT_DIR: &str = ".git";
