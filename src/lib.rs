//! autocommit - Watches a directory and periodically commits its changes with
//! a generated, human-readable commit message.
//!
//! # Overview
//!
//! File changes are classified by extension, analyzed by content where that
//! helps (keywords, import lists, manifests), and summarized into one commit
//! message per batch. Commits are made with git2 and pushed with the system
//! `git` binary when a remote is configured.

pub mod analysis;
pub mod category;
pub mod error;
pub mod git;
pub mod summary;
pub mod watch;

// Re-export commonly used types
pub use analysis::{ChangeKind, ChangeType, FileChange, describe};
pub use category::{Category, classify};
pub use error::{GitError, WatchError};
pub use git::{GitClient, VcsClient};
pub use summary::{ChangeBatch, CommitMessage, SharedBatch, summarize};
pub use watch::{CommitCycle, CycleOutcome, Notification, Notifier, WatchConfig, WatchSession};
