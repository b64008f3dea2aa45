use async_trait::async_trait;
use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const DEFAULT_COMMIT_MESSAGE: &str = "Updated drink data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Checkout,
    Pull,
    Add,
    Commit,
    Push,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncStep::Checkout => "checkout",
            SyncStep::Pull => "pull",
            SyncStep::Add => "add",
            SyncStep::Commit => "commit",
            SyncStep::Push => "push",
        })
    }
}

/// Any failure talking to the remote repository. Causes (missing remote, auth,
/// conflicts) are not told apart; `detail` carries whatever git reported.
#[derive(Debug, Clone, Error)]
#[error("git {step} failed: {detail}")]
pub struct SyncError {
    pub step: SyncStep,
    pub detail: String,
}

impl SyncError {
    pub fn new(step: SyncStep, detail: impl Into<String>) -> Self {
        Self {
            step,
            detail: detail.into(),
        }
    }
}

/// What `commit_and_push` did with a saved artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    /// Syncing is switched off; the artifact only exists locally.
    Skipped,
}

#[async_trait]
pub trait SyncClient: Send + Sync {
    /// Makes sure the local checkout exists. Called once before serving.
    async fn ensure_checkout(&self) -> Result<(), SyncError>;

    /// Brings the local checkout up to date with the remote.
    async fn pull(&self) -> Result<(), SyncError>;

    /// Stages `artifact`, commits it with `message` and pushes.
    async fn commit_and_push(
        &self,
        artifact: &Path,
        message: &str,
    ) -> Result<PushOutcome, SyncError>;
}

/// Sync client for running without a remote. Nothing is pulled or pushed and
/// `commit_and_push` reports [`PushOutcome::Skipped`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnlySync;

#[async_trait]
impl SyncClient for LocalOnlySync {
    async fn ensure_checkout(&self) -> Result<(), SyncError> {
        Ok(())
    }

    async fn pull(&self) -> Result<(), SyncError> {
        Ok(())
    }

    async fn commit_and_push(
        &self,
        artifact: &Path,
        _message: &str,
    ) -> Result<PushOutcome, SyncError> {
        debug!(artifact = %artifact.display(), "sync disabled; keeping change local");
        Ok(PushOutcome::Skipped)
    }
}

/// Drives the `git` binary inside a local checkout.
#[derive(Debug, Clone)]
pub struct GitSyncClient {
    repo_path: PathBuf,
    remote_url: Option<String>,
}

impl GitSyncClient {
    pub fn new(repo_path: impl Into<PathBuf>, remote_url: Option<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            remote_url: remote_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    async fn git<I, S>(&self, step: SyncStep, dir: &Path, args: I) -> Result<String, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .await
            .map_err(|e| SyncError::new(step, format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr
            };
            return Err(SyncError::new(step, detail));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Path of `artifact` as git should see it from inside the checkout.
    fn pathspec<'a>(&self, artifact: &'a Path) -> &'a Path {
        artifact.strip_prefix(&self.repo_path).unwrap_or(artifact)
    }
}

#[async_trait]
impl SyncClient for GitSyncClient {
    async fn ensure_checkout(&self) -> Result<(), SyncError> {
        if tokio::fs::try_exists(&self.repo_path).await.unwrap_or(false) {
            debug!(repo = %self.repo_path.display(), "checkout already present");
            return Ok(());
        }

        let Some(url) = self.remote_url.as_deref() else {
            warn!(
                repo = %self.repo_path.display(),
                "no remote url configured; creating an empty directory instead of cloning"
            );
            return tokio::fs::create_dir_all(&self.repo_path)
                .await
                .map_err(|e| SyncError::new(SyncStep::Checkout, e.to_string()));
        };

        info!(%url, repo = %self.repo_path.display(), "cloning ratings repository");
        self.git(
            SyncStep::Checkout,
            Path::new("."),
            [OsStr::new("clone"), OsStr::new(url), self.repo_path.as_os_str()],
        )
        .await?;
        Ok(())
    }

    async fn pull(&self) -> Result<(), SyncError> {
        self.git(SyncStep::Pull, &self.repo_path, ["pull"]).await?;
        debug!(repo = %self.repo_path.display(), "pulled latest ratings");
        Ok(())
    }

    async fn commit_and_push(
        &self,
        artifact: &Path,
        message: &str,
    ) -> Result<PushOutcome, SyncError> {
        let pathspec = self.pathspec(artifact);
        self.git(
            SyncStep::Add,
            &self.repo_path,
            [OsStr::new("add"), OsStr::new("--"), pathspec.as_os_str()],
        )
        .await?;
        self.git(
            SyncStep::Commit,
            &self.repo_path,
            ["commit", "-m", message],
        )
        .await?;
        self.git(SyncStep::Push, &self.repo_path, ["push"]).await?;

        info!(
            repo = %self.repo_path.display(),
            artifact = %pathspec.display(),
            "pushed ratings"
        );
        Ok(PushOutcome::Pushed)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
