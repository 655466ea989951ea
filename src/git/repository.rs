//! Repository operations using git2.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Commit, ErrorCode, IndexAddOption, Oid, Repository, RepositoryInitOptions,
    Signature, Status, StatusOptions,
};
use tracing::{debug, warn};

use crate::analysis::ChangeKind;
use crate::error::GitError;

/// Identity used when git config has no `user.name` / `user.email`.
const FALLBACK_NAME: &str = "autocommit";
const FALLBACK_EMAIL: &str = "autocommit@localhost";

/// Message of the commit recorded when a repository is created.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// What [`ensure_repository`] had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// A new repository was created on the branch.
    Initialized { branch: String },
    /// The branch already existed and is now checked out.
    SwitchedBranch { branch: String },
    /// The branch was created at HEAD and checked out.
    CreatedBranch { branch: String },
    /// HEAD was already on the branch.
    AlreadyOnBranch { branch: String },
}

impl fmt::Display for Bootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bootstrap::Initialized { branch } => {
                write!(f, "Git repository initialized with {branch} branch")
            }
            Bootstrap::SwitchedBranch { branch } => write!(f, "Switched to branch {branch}"),
            Bootstrap::CreatedBranch { branch } => {
                write!(f, "Created and switched to branch {branch}")
            }
            Bootstrap::AlreadyOnBranch { branch } => {
                write!(f, "Using existing repository on {branch}")
            }
        }
    }
}

/// Open the repository rooted at `root`.
pub fn open_repository(root: &Path) -> Result<Repository, GitError> {
    Repository::open(root).map_err(|source| GitError::OpenRepository {
        path: root.to_path_buf(),
        source,
    })
}

/// Open or create the repository at `root` and make `branch` current.
///
/// A new repository gets `branch` as its initial branch and an initial commit
/// of whatever the directory already holds.
pub fn ensure_repository(root: &Path, branch: &str) -> Result<(Repository, Bootstrap), GitError> {
    match Repository::open(root) {
        Ok(repo) => {
            let bootstrap = ensure_branch(&repo, branch)?;
            Ok((repo, bootstrap))
        }
        Err(e) if e.code() == ErrorCode::NotFound => {
            let mut opts = RepositoryInitOptions::new();
            opts.initial_head(branch);
            let repo = Repository::init_opts(root, &opts).map_err(GitError::InitFailed)?;

            match stage_and_commit(&repo, INITIAL_COMMIT_MESSAGE) {
                Ok(oid) => debug!("Initial commit {}", oid),
                Err(GitError::NoChanges) => debug!("Empty directory, no initial commit"),
                Err(e) => return Err(e),
            }

            Ok((repo, Bootstrap::Initialized { branch: branch.to_string() }))
        }
        Err(source) => Err(GitError::OpenRepository {
            path: root.to_path_buf(),
            source,
        }),
    }
}

/// Check out `branch`, creating it at HEAD when it does not exist yet.
fn ensure_branch(repo: &Repository, branch: &str) -> Result<Bootstrap, GitError> {
    let refname = format!("refs/heads/{branch}");
    let branch_err = |e: git2::Error| GitError::BranchFailed(branch.to_string(), e);
    let name = branch.to_string();

    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            // No commits yet: just point the unborn HEAD at the branch.
            repo.set_head(&refname).map_err(branch_err)?;
            return Ok(Bootstrap::AlreadyOnBranch { branch: name });
        }
        Err(e) => return Err(branch_err(e)),
    };

    if head.name() == Some(refname.as_str()) {
        return Ok(Bootstrap::AlreadyOnBranch { branch: name });
    }

    if repo.find_branch(branch, BranchType::Local).is_ok() {
        let target = repo.revparse_single(&refname).map_err(branch_err)?;
        repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))
            .map_err(branch_err)?;
        repo.set_head(&refname).map_err(branch_err)?;
        return Ok(Bootstrap::SwitchedBranch { branch: name });
    }

    let commit = head.peel_to_commit().map_err(branch_err)?;
    repo.branch(branch, &commit, false).map_err(branch_err)?;
    repo.set_head(&refname).map_err(branch_err)?;
    Ok(Bootstrap::CreatedBranch { branch: name })
}

/// Stage all changes and create a commit.
///
/// Uses `index.add_all()` and `index.update_all()` to stage everything (like
/// `git add -A`, honouring `.gitignore`), then creates a commit on HEAD with
/// the given message. Returns [`GitError::NoChanges`] when the staged tree is
/// identical to HEAD's.
pub fn stage_and_commit(repo: &Repository, message: &str) -> Result<Oid, GitError> {
    // Stage all changes
    let mut index = repo.index().map_err(GitError::StagingFailed)?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(GitError::StagingFailed)?;
    index
        .update_all(["*"].iter(), None)
        .map_err(GitError::StagingFailed)?;
    index.write().map_err(GitError::StagingFailed)?;

    // Write the index as a tree
    let tree_id = index.write_tree().map_err(GitError::StagingFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    // Get the parent commit (HEAD), if any
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(GitError::CommitFailed(e)),
    };

    let unchanged = match &parent {
        Some(parent) => parent.tree_id() == tree_id,
        None => tree.is_empty(),
    };
    if unchanged {
        return Err(GitError::NoChanges);
    }

    let sig = signature(repo)?;
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(GitError::CommitFailed)
}

/// Committer identity from git config, or the fallback identity.
fn signature(repo: &Repository) -> Result<Signature<'static>, GitError> {
    match repo.signature() {
        Ok(sig) => Ok(sig),
        Err(e) => {
            warn!("No git identity configured ({}), committing as {}", e.message(), FALLBACK_NAME);
            Signature::now(FALLBACK_NAME, FALLBACK_EMAIL).map_err(GitError::CommitFailed)
        }
    }
}

/// Whether a remote called `name` is configured.
pub fn has_remote(repo: &Repository, name: &str) -> bool {
    repo.find_remote(name).is_ok()
}

/// Point remote `name` at `url`, replacing any existing remote of that name.
pub fn configure_remote(repo: &Repository, name: &str, url: &str) -> Result<(), GitError> {
    if has_remote(repo, name) {
        repo.remote_delete(name).map_err(|source| GitError::RemoteFailed {
            name: name.to_string(),
            source,
        })?;
    }

    repo.remote(name, url).map_err(|source| GitError::RemoteFailed {
        name: name.to_string(),
        source,
    })?;
    Ok(())
}

/// Text of `path` as committed at HEAD.
///
/// `path` may be absolute (inside the work tree) or relative to it. Returns
/// `None` for new files, binary blobs, non-UTF-8 content or an unborn HEAD.
pub fn head_content(repo: &Repository, path: &Path) -> Option<String> {
    let relative = repo
        .workdir()
        .and_then(|workdir| path.strip_prefix(workdir).ok())
        .unwrap_or(path);

    let tree = repo.head().ok()?.peel_to_tree().ok()?;
    let entry = tree.get_path(relative).ok()?;
    let blob = repo.find_blob(entry.id()).ok()?;
    if blob.is_binary() {
        return None;
    }

    String::from_utf8(blob.content().to_vec()).ok()
}

/// Pending working-tree changes (staged, unstaged and untracked) as absolute
/// paths with their change kind.
pub fn pending_changes(repo: &Repository) -> Result<Vec<(PathBuf, ChangeKind)>, GitError> {
    let workdir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let statuses = repo.statuses(Some(&mut opts)).map_err(GitError::StatusFailed)?;

    let mut changes = Vec::new();
    for entry in statuses.iter() {
        let Some(path) = entry.path() else {
            continue;
        };
        let Some(kind) = status_kind(entry.status()) else {
            continue;
        };
        changes.push((workdir.join(path), kind));
    }

    Ok(changes)
}

fn status_kind(status: Status) -> Option<ChangeKind> {
    if status.intersects(Status::WT_DELETED | Status::INDEX_DELETED) {
        Some(ChangeKind::Deleted)
    } else if status.intersects(Status::WT_NEW | Status::INDEX_NEW) {
        Some(ChangeKind::Added)
    } else if status.intersects(
        Status::WT_MODIFIED
            | Status::INDEX_MODIFIED
            | Status::WT_RENAMED
            | Status::INDEX_RENAMED
            | Status::WT_TYPECHANGE
            | Status::INDEX_TYPECHANGE,
    ) {
        Some(ChangeKind::Modified)
    } else {
        None
    }
}
