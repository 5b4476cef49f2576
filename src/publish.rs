//! Branch publishing workflows.
//!
//! The conditional logic of this crate lives here: the branch-creation
//! fallback chain, upstream resolution, and the validated
//! push-with-tag-following orchestrator. Everything else is a one-shot
//! command wrapper in [`crate::git`].

use crate::constants::{DEFAULT_REMOTE, DETACHED_HEAD};
use crate::git;
use crate::process::{GitLogger, StdioMode};
use crate::repo::remote_exists;
use anyhow::Context;
use std::path::Path;

/// Creates `branch` and switches to it, falling back across git versions.
///
/// Attempts, in order: `git switch -c`, `git checkout -b`, `git switch`.
/// The first success wins; only the last attempt's failure propagates. The
/// chain is a compatibility shim for older git binaries and for branches
/// that already exist, not a retry mechanism.
pub fn create_or_switch_branch(
    repo: &Path,
    branch: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    if git::switch_create(repo, branch, stdio, log).is_ok() {
        return Ok(());
    }
    if git::checkout_new(repo, branch, stdio, log).is_ok() {
        return Ok(());
    }
    git::switch(repo, branch, stdio, log)
        .with_context(|| format!("Failed to create or switch to branch '{}'", branch))
}

/// Ensures the current branch has an upstream and returns it.
///
/// If an upstream is already configured this is a read-only no-op returning
/// it unchanged. Otherwise the branch is bound to
/// `<default_remote>/<branch>`: first by `--set-upstream-to`, assuming the
/// remote branch exists, and failing that by `push -u`, which creates the
/// remote branch and sets the upstream in one step.
pub fn ensure_upstream(
    repo: &Path,
    default_remote: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<String> {
    let branch = git::current_branch(repo, StdioMode::Capture, log)?;
    let upstream = git::upstream(repo, StdioMode::Capture, log)?;
    if !upstream.is_empty() {
        return Ok(upstream);
    }

    if git::set_upstream(repo, &branch, default_remote, stdio, log).is_err() {
        // Remote branch absent: publish it.
        git::push_set_upstream(repo, default_remote, &branch, stdio, log).with_context(|| {
            format!("Failed to publish branch '{}' to '{}'", branch, default_remote)
        })?;
    }
    Ok(format!("{}/{}", default_remote, branch))
}

/// Splits a `local:remote` branch spec.
///
/// A spec without a separator pushes the same name on both sides. Only the
/// first colon separates; an empty side is invalid.
fn split_branch_spec(spec: &str) -> anyhow::Result<(&str, &str)> {
    match spec.split_once(':') {
        None => Ok((spec, spec)),
        Some((local, remote)) if !local.is_empty() && !remote.is_empty() => Ok((local, remote)),
        Some(_) => anyhow::bail!("Invalid branch spec: {:?}", spec),
    }
}

fn local_branch_exists(
    repo: &Path,
    branch: &str,
    log: GitLogger,
) -> anyhow::Result<bool> {
    let output = git::run_git_with(
        repo,
        &["branch", "--list", branch],
        StdioMode::Capture,
        log,
    )
    .with_context(|| format!("Failed to list branch '{}'", branch))?;
    Ok(!output.stdout_trimmed().is_empty())
}

/// Upstream configured for `branch`, if any, via a targeted ref query.
fn branch_upstream(repo: &Path, branch: &str, log: GitLogger) -> anyhow::Result<String> {
    let refname = format!("refs/heads/{}", branch);
    let output = git::run_git_with(
        repo,
        &["for-each-ref", "--format=%(upstream:short)", &refname],
        StdioMode::Capture,
        log,
    )
    .with_context(|| format!("Failed to query upstream of '{}'", branch))?;
    Ok(output.stdout_trimmed().to_string())
}

/// Pushes a branch with `--follow-tags`, setting the upstream if needed.
///
/// With no explicit `branch` the current branch is used; a detached HEAD is
/// a fatal error. `branch` may carry a `local:remote` pair. Branch and
/// remote existence are validated up front so the caller gets a descriptive
/// error instead of raw git output when the input is wrong.
pub fn push_follow_tags(
    repo: &Path,
    branch: Option<&str>,
    remote: Option<&str>,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    let spec = match branch {
        Some(spec) => spec.to_string(),
        None => {
            let current = git::current_branch(repo, StdioMode::Capture, log)?;
            if current == DETACHED_HEAD {
                anyhow::bail!("Cannot push from a detached HEAD; name a branch explicitly");
            }
            current
        }
    };
    let (local, remote_branch) = split_branch_spec(&spec)?;
    git::validate_ref_name(local)?;
    git::validate_ref_name(remote_branch)?;

    let remote = remote.unwrap_or(DEFAULT_REMOTE);
    git::validate_ref_name(remote)?;

    if !local_branch_exists(repo, local, log)? {
        anyhow::bail!("Local branch '{}' does not exist", local);
    }
    if !remote_exists(repo, remote, log)? {
        anyhow::bail!("Remote '{}' is not configured", remote);
    }

    let refspec = if local == remote_branch {
        local.to_string()
    } else {
        format!("{}:{}", local, remote_branch)
    };

    let has_upstream = !branch_upstream(repo, local, log)?.is_empty();
    let result = if has_upstream {
        git::run_git_with(repo, &["push", "--follow-tags", remote, &refspec], stdio, log)
    } else {
        git::run_git_with(
            repo,
            &["push", "--follow-tags", "-u", remote, &refspec],
            stdio,
            log,
        )
    };
    result.with_context(|| format!("Failed to push '{}' to '{}'", refspec, remote))?;
    Ok(())
}
