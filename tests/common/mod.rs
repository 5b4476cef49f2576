//! Test infrastructure for git-branch-ops integration tests.

use anyhow::Result;
use git_branch_ops::git::run_git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary git repository for testing.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl TestRepo {
    /// Creates a new test repository with an initial commit on the master branch.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();

        run_git(&path, &["init", "-b", "master"])?;

        run_git(&path, &["config", "user.email", "test@example.com"])?;
        run_git(&path, &["config", "user.name", "Test User"])?;

        std::fs::write(path.join("README.md"), "# Test Repo\n")?;
        run_git(&path, &["add", "README.md"])?;
        run_git(&path, &["commit", "-m", "Initial commit"])?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Creates a test repository with a bare `origin` remote that master
    /// tracks. Returns the repo and the remote TempDir (must be kept alive).
    pub fn with_remote() -> Result<(Self, TempDir)> {
        let remote_dir = TempDir::new()?;
        run_git(remote_dir.path(), &["init", "--bare"])?;

        let local = Self::new()?;

        run_git(
            &local.path,
            &["remote", "add", "origin", remote_dir.path().to_str().unwrap()],
        )?;
        run_git(&local.path, &["push", "-u", "origin", "master"])?;

        Ok((local, remote_dir))
    }

    /// Creates a test repository plus a bare `origin` remote, without
    /// pushing anything to it.
    pub fn with_empty_remote() -> Result<(Self, TempDir)> {
        let remote_dir = TempDir::new()?;
        run_git(remote_dir.path(), &["init", "--bare"])?;

        let local = Self::new()?;

        run_git(
            &local.path,
            &["remote", "add", "origin", remote_dir.path().to_str().unwrap()],
        )?;

        Ok((local, remote_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modifies a tracked file without staging it.
    pub fn make_dirty(&self) -> Result<()> {
        std::fs::write(self.path.join("README.md"), "# Modified\n")?;
        Ok(())
    }

    /// Modifies a tracked file and stages the change.
    pub fn stage_change(&self) -> Result<()> {
        self.make_dirty()?;
        run_git(&self.path, &["add", "README.md"])?;
        Ok(())
    }

    /// Commits a new file so the tree is clean afterwards.
    pub fn commit_file(&self, name: &str, content: &str) -> Result<()> {
        std::fs::write(self.path.join(name), content)?;
        run_git(&self.path, &["add", name])?;
        run_git(&self.path, &["commit", "-m", &format!("Add {}", name)])?;
        Ok(())
    }

    /// Creates a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["tag", name])?;
        Ok(())
    }

    /// Detaches HEAD at the current commit.
    pub fn detach_head(&self) -> Result<()> {
        let head = run_git(&self.path, &["rev-parse", "HEAD"])?;
        run_git(&self.path, &["checkout", &head])?;
        Ok(())
    }
}
