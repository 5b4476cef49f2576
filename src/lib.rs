//! Thin typed wrappers around git command-line operations.
//!
//! This crate maps small functions onto git invocations:
//! - Read-only probes: current branch, upstream, tag existence, dirty-state
//!   detection, commit hashes, latest tag by prefix
//! - Branch creation with a version-compatibility fallback chain
//! - Upstream resolution and branch publishing with tag-following
//! - Idempotent remote registration
//!
//! Every call spawns one git process, blocks until it exits, and holds no
//! state of its own; repository state lives entirely in git. Callers must
//! not run two mutating operations against the same working directory
//! concurrently — this crate provides no serialization, and git's own
//! locking is the only protection.

pub mod constants;
pub mod git;
pub mod path;
pub mod process;
pub mod publish;
pub mod repo;

pub use process::{CmdOutput, CommandError, GitLogger, StdioMode, no_op_logger, verbose_logger};
pub use publish::{create_or_switch_branch, ensure_upstream, push_follow_tags};
pub use repo::{Remote, is_init, remote_create_once, remote_exists};
