//! The version-control seam used by the commit cycle.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::Oid;

use crate::analysis::{ContentSource, read_text};
use crate::error::GitError;

use super::push::push;
use super::repository::{has_remote, head_content, open_repository, stage_and_commit};

/// Version-control operations needed by a commit cycle.
///
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Stage every change in the work tree and commit it with `message`.
    async fn stage_and_commit(&self, message: &str) -> Result<Oid, GitError>;

    /// Whether a remote with this name is configured.
    async fn has_remote(&self, remote: &str) -> bool;

    /// Push `branch` to `remote`.
    async fn push(&self, remote: &str, branch: &str) -> Result<(), GitError>;
}

/// [`VcsClient`] backed by the repository at a work-tree root.
///
/// The repository is reopened per operation so the client stays `Sync`.
#[derive(Debug, Clone)]
pub struct GitClient {
    root: PathBuf,
}

impl GitClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl VcsClient for GitClient {
    async fn stage_and_commit(&self, message: &str) -> Result<Oid, GitError> {
        let repo = open_repository(&self.root)?;
        stage_and_commit(&repo, message)
    }

    async fn has_remote(&self, remote: &str) -> bool {
        open_repository(&self.root)
            .map(|repo| has_remote(&repo, remote))
            .unwrap_or(false)
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        push(&self.root, remote, branch).await
    }
}

/// Current content from the work tree, previous content from HEAD.
impl ContentSource for GitClient {
    fn current(&self, path: &Path) -> Option<String> {
        read_text(path)
    }

    fn previous(&self, path: &Path) -> Option<String> {
        let repo = open_repository(&self.root).ok()?;
        head_content(&repo, path)
    }
}
