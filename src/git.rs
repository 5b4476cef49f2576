//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands: read-only
//! probes that parse trimmed stdout, and single-command mutating operations.
//! Every function is parameterized by the repository working directory and
//! holds no state of its own.

use crate::constants::{CHANGED_SENTINEL, DETACHED_HEAD};
use crate::process::{self, CmdOutput, CommandError, GitLogger, StdioMode, no_op_logger};
use anyhow::Context;
use std::path::Path;

/// Runs a git command with captured streams and returns trimmed stdout.
///
/// This is the plain entry point used by tests and callers that do not
/// care about stream inheritance or logging.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = run_git_raw(repo, args, StdioMode::Capture, no_op_logger)
        .with_context(|| format!("git {} failed", args.join(" ")))?;
    Ok(output.stdout_trimmed().to_string())
}

/// Runs a git command with the caller's stream mode.
pub fn run_git_with(
    repo: &Path,
    args: &[&str],
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<CmdOutput> {
    run_git_raw(repo, args, stdio, log)
        .with_context(|| format!("git {} failed", args.join(" ")))
}

fn run_git_raw(
    repo: &Path,
    args: &[&str],
    stdio: StdioMode,
    log: GitLogger,
) -> Result<CmdOutput, CommandError> {
    process::run_command(repo, "git", args, stdio, log)
}

/// Runs a git command whose stdout the caller parses.
///
/// Capture is always forced here, whatever stream mode the caller asked
/// for: with inherited streams there is nothing to parse. Every query
/// function goes through this single enforcement point.
fn run_git_query(
    repo: &Path,
    args: &[&str],
    _stdio: StdioMode,
    log: GitLogger,
) -> Result<String, CommandError> {
    run_git_raw(repo, args, StdioMode::Capture, log)
        .map(|output| output.stdout_trimmed().to_string())
}

/// Rejects names that cannot safely appear as a git argv element.
pub(crate) fn validate_ref_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name.contains('\0') || name.contains('\n') || name.starts_with('-') {
        anyhow::bail!("Invalid ref name: {:?}", name);
    }
    Ok(())
}

// --- queries ---

/// Returns the current branch name, or the `"HEAD"` literal when detached.
pub fn current_branch(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<String> {
    run_git_query(repo, &["rev-parse", "--abbrev-ref", "HEAD"], stdio, log)
        .context("Failed to get current branch")
}

/// Returns true when HEAD points at a commit rather than a branch.
pub fn is_detached_head(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<bool> {
    Ok(current_branch(repo, stdio, log)? == DETACHED_HEAD)
}

/// Returns the symbolic upstream of the current branch (e.g. `origin/main`),
/// or an empty string when none is configured.
///
/// A non-zero exit from git is the "no upstream" answer and is swallowed;
/// only a spawn failure propagates.
pub fn upstream(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<String> {
    match run_git_query(
        repo,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        stdio,
        log,
    ) {
        Ok(name) => Ok(name),
        Err(CommandError::Failed { .. }) => Ok(String::new()),
        Err(err) => Err(err).context("Failed to query upstream"),
    }
}

/// Returns true when `refs/tags/<tag>` exists.
pub fn tag_exists(repo: &Path, tag: &str, stdio: StdioMode, log: GitLogger) -> anyhow::Result<bool> {
    validate_ref_name(tag)?;
    let refname = format!("refs/tags/{}", tag);
    match run_git_query(
        repo,
        &["rev-parse", "--quiet", "--verify", &refname],
        stdio,
        log,
    ) {
        Ok(output) => Ok(!output.is_empty()),
        Err(CommandError::Failed { .. }) => Ok(false),
        Err(err) => Err(err).with_context(|| format!("Failed to check tag '{}'", tag)),
    }
}

/// Runs a quiet diff through a shell and reports whether the fallback
/// sentinel was echoed.
///
/// The diff exit code alone is ambiguous across shells without a capturing
/// wrapper, so the non-zero branch echoes a literal token and the check is
/// a string comparison on captured stdout. Caller-supplied values never
/// appear in the script text; they are passed as positional parameters so
/// the shell treats them as data.
fn sentinel_diff(
    repo: &Path,
    script: &str,
    params: &[&str],
    _stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<bool> {
    let mut args = Vec::with_capacity(params.len() + 3);
    args.push("-lc");
    args.push(script);
    // $0 for the inline script; params bind to $1, $2, ...
    args.push("bash");
    args.extend_from_slice(params);
    let output = process::run_command(repo, "bash", &args, StdioMode::Capture, log)
        .with_context(|| format!("Failed to run `{}`", script))?;
    Ok(output.stdout_trimmed() == CHANGED_SENTINEL)
}

/// Returns true if tracked files have unstaged modifications.
pub fn has_working_changes(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<bool> {
    sentinel_diff(
        repo,
        &format!("git diff --quiet || echo {}", CHANGED_SENTINEL),
        &[],
        stdio,
        log,
    )
}

/// Returns true if the index differs from HEAD.
pub fn has_index_changes(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<bool> {
    sentinel_diff(
        repo,
        &format!("git diff --cached --quiet || echo {}", CHANGED_SENTINEL),
        &[],
        stdio,
        log,
    )
}

/// Returns true if either the working tree or the index is dirty.
pub fn has_uncommitted_changes(
    repo: &Path,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<bool> {
    Ok(has_working_changes(repo, stdio, log)? || has_index_changes(repo, stdio, log)?)
}

/// Returns true if the working tree differs from `tag` under `pathspec`.
pub fn has_changes_since_tag(
    repo: &Path,
    tag: &str,
    pathspec: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<bool> {
    validate_ref_name(tag)?;
    if pathspec.is_empty() || pathspec.contains('\0') {
        anyhow::bail!("Invalid pathspec: {:?}", pathspec);
    }
    sentinel_diff(
        repo,
        &format!("git diff --quiet \"$1\" -- \"$2\" || echo {}", CHANGED_SENTINEL),
        &[tag, pathspec],
        stdio,
        log,
    )
}

/// Returns the highest version-sorted tag matching `<prefix>*`, if any.
pub fn last_tag_for_prefix(
    repo: &Path,
    prefix: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<Option<String>> {
    validate_ref_name(prefix)?;
    let glob = format!("{}*", prefix);
    let output = run_git_query(
        repo,
        &["tag", "--list", &glob, "--sort=version:refname"],
        stdio,
        log,
    )
    .with_context(|| format!("Failed to list tags for prefix '{}'", prefix))?;
    Ok(output.lines().last().map(str::to_string))
}

/// Returns the commit hash of HEAD, abbreviated when `short` is set.
pub fn current_commit(
    repo: &Path,
    short: bool,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<String> {
    let args: &[&str] = if short {
        &["rev-parse", "--short", "HEAD"]
    } else {
        &["rev-parse", "HEAD"]
    };
    run_git_query(repo, args, stdio, log).context("Failed to get current commit")
}

// --- mutators ---

/// Points the upstream of `branch` at `<remote>/<branch>`.
///
/// Fails when the remote branch does not exist; `publish::ensure_upstream`
/// treats that failure as the cue to publish the branch instead.
pub fn set_upstream(
    repo: &Path,
    branch: &str,
    remote: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(branch)?;
    validate_ref_name(remote)?;
    let target = format!("{}/{}", remote, branch);
    run_git_with(
        repo,
        &["branch", "--set-upstream-to", &target, branch],
        stdio,
        log,
    )
    .with_context(|| format!("Failed to set upstream of '{}' to '{}'", branch, target))?;
    Ok(())
}

/// Pulls with rebase and autostash to preserve local modifications.
pub fn pull_rebase_autostash(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<()> {
    run_git_with(repo, &["pull", "--rebase", "--autostash"], stdio, log)
        .context("Failed to pull with rebase")?;
    Ok(())
}

/// Commits all tracked changes with the given message.
///
/// Callers should check for changes first; git fails on an empty commit.
pub fn commit_all_with_message(
    repo: &Path,
    message: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    run_git_with(repo, &["commit", "-am", message], stdio, log)
        .context("Failed to commit changes")?;
    Ok(())
}

/// Plain push of the current branch to its upstream.
pub fn push(repo: &Path, stdio: StdioMode, log: GitLogger) -> anyhow::Result<()> {
    run_git_with(repo, &["push"], stdio, log).context("Failed to push")?;
    Ok(())
}

/// Pushes `branch` to `remote` and sets it as upstream in one step.
pub fn push_set_upstream(
    repo: &Path,
    remote: &str,
    branch: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(remote)?;
    validate_ref_name(branch)?;
    run_git_with(repo, &["push", "-u", remote, branch], stdio, log)
        .with_context(|| format!("Failed to push '{}' to '{}'", branch, remote))?;
    Ok(())
}

/// Creates a tag; annotated with `-a`/`-m` when a message is given.
pub fn create_tag(
    repo: &Path,
    tag: &str,
    message: Option<&str>,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(tag)?;
    let result = match message {
        Some(message) => run_git_with(repo, &["tag", "-a", tag, "-m", message], stdio, log),
        None => run_git_with(repo, &["tag", tag], stdio, log),
    };
    result.with_context(|| format!("Failed to create tag '{}'", tag))?;
    Ok(())
}

/// Pushes a single tag to `remote`.
pub fn push_tag(
    repo: &Path,
    remote: &str,
    tag: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(remote)?;
    validate_ref_name(tag)?;
    let refname = format!("refs/tags/{}", tag);
    run_git_with(repo, &["push", remote, &refname], stdio, log)
        .with_context(|| format!("Failed to push tag '{}' to '{}'", tag, remote))?;
    Ok(())
}

// --- branch-creation candidates ---
// The three commands tried in order by `publish::create_or_switch_branch`.

/// `git switch -c <branch>`: atomic create-and-switch, newest syntax.
pub fn switch_create(
    repo: &Path,
    branch: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(branch)?;
    run_git_with(repo, &["switch", "-c", branch], stdio, log)
        .with_context(|| format!("Failed to create branch '{}'", branch))?;
    Ok(())
}

/// `git checkout -b <branch>`: legacy create-and-switch syntax.
pub fn checkout_new(
    repo: &Path,
    branch: &str,
    stdio: StdioMode,
    log: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(branch)?;
    run_git_with(repo, &["checkout", "-b", branch], stdio, log)
        .with_context(|| format!("Failed to checkout new branch '{}'", branch))?;
    Ok(())
}

/// `git switch <branch>`: switch to an existing branch.
pub fn switch(repo: &Path, branch: &str, stdio: StdioMode, log: GitLogger) -> anyhow::Result<()> {
    validate_ref_name(branch)?;
    run_git_with(repo, &["switch", branch], stdio, log)
        .with_context(|| format!("Failed to switch to branch '{}'", branch))?;
    Ok(())
}
