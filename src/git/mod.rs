//! Git operations: repository bootstrap and commits via git2, pushes via the
//! system `git` binary.

pub mod client;
pub mod push;
pub mod repository;

pub use client::{GitClient, VcsClient};
pub use push::{check_git_installed, get_push_timeout};
pub use repository::{
    Bootstrap, configure_remote, ensure_repository, has_remote, head_content, open_repository,
    pending_changes, stage_and_commit,
};
