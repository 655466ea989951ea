//! Error types for autocommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from version-control operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to initialize repository: {0}")]
    InitFailed(#[source] git2::Error),

    #[error("Failed to switch to branch '{0}': {1}")]
    BranchFailed(String, #[source] git2::Error),

    #[error("No changes to commit (working tree is clean)")]
    NoChanges,

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Failed to read repository status: {0}")]
    StatusFailed(#[source] git2::Error),

    #[error("Failed to configure remote '{name}': {source}")]
    RemoteFailed {
        name: String,
        #[source]
        source: git2::Error,
    },

    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git push to {remote}/{branch} failed: {stderr}")]
    PushFailed {
        remote: String,
        branch: String,
        stderr: String,
    },

    #[error("git push timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors from the change feed and watch session.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watch root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to start file watcher: {0}")]
    WatcherFailed(#[source] notify::Error),

    #[error("Commit interval must be greater than zero")]
    ZeroInterval,
}
