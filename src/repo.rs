//! Repository detection and remote registration.

use crate::constants::GIT_DIR;
use crate::git;
use crate::path;
use crate::process::{GitLogger, StdioMode, no_op_logger};
use std::path::Path;

/// Returns true when `path` is an initialized repository root.
///
/// A nonexistent path is simply not a repository; no error is raised. The
/// check is the presence of the `.git` entry (a directory for ordinary
/// repositories, a file for worktrees).
pub fn is_init(path: impl AsRef<Path>) -> bool {
    let path = path::resolve(path);
    if !path.exists() {
        return false;
    }
    path.join(GIT_DIR).exists()
}

/// Handle to a configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Returns true when a remote named `name` is configured.
///
/// The single place that matches `git remote` output: whole trimmed lines
/// only, so `origin` never matches `origin2`.
pub fn remote_exists(repo: &Path, name: &str, log: GitLogger) -> anyhow::Result<bool> {
    let output = git::run_git_with(repo, &["remote"], StdioMode::Capture, log)?;
    Ok(output.stdout.lines().any(|line| line.trim() == name))
}

/// Registers a remote unless one with that name already exists.
///
/// Returns `None` for a pre-existing remote, whose URL is never touched,
/// and the created [`Remote`] otherwise. Calling this twice with the same
/// name creates the remote once.
pub fn remote_create_once(
    repo: &Path,
    name: &str,
    url: &str,
) -> anyhow::Result<Option<Remote>> {
    git::validate_ref_name(name)?;
    if remote_exists(repo, name, no_op_logger)? {
        return Ok(None);
    }
    git::run_git(repo, &["remote", "add", name, url])?;
    Ok(Some(Remote {
        name: name.to_string(),
        url: url.to_string(),
    }))
}
