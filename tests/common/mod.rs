//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

/// A throwaway work tree with a git repository, for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    ///
    /// The directory is canonicalized so paths compare equal to what the
    /// watcher and git2 report.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let root = dir.path().canonicalize().expect("Failed to canonicalize temp dir");
        let repo = Repository::init(&root).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");

        Self { dir, repo }
    }

    /// Canonical work-tree root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("Failed to canonicalize temp dir")
    }

    /// Absolute path of a file inside the work tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file (creating parent directories). Returns its absolute path.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Delete a file. Returns its absolute path.
    pub fn remove(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::remove_file(&path).expect("Failed to remove test file");
        path
    }

    /// Commit everything in the work tree, bypassing the crate under test.
    pub fn commit_all(&self, message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to stage");
        index
            .update_all(["*"].iter(), None)
            .expect("Failed to stage deletions");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = Signature::now("Test User", "test@example.com")
            .expect("Failed to create signature");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Number of commits reachable from HEAD (0 for an unborn HEAD).
    pub fn commit_count(&self) -> usize {
        let Ok(head) = self.repo.head() else {
            return 0;
        };
        let mut revwalk = self.repo.revwalk().expect("Failed to create revwalk");
        revwalk
            .push(head.target().expect("HEAD has no target"))
            .expect("Failed to push HEAD");
        revwalk.count()
    }

    /// Message of the HEAD commit.
    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .expect("No HEAD")
            .peel_to_commit()
            .expect("HEAD is not a commit")
            .message()
            .expect("Non-UTF-8 message")
            .to_string()
    }
}

/// A bare repository usable as a push target.
pub struct BareRemote {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl BareRemote {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init_bare(dir.path()).expect("Failed to init bare repo");
        Self { dir, repo }
    }

    /// URL usable with `git push`.
    pub fn url(&self) -> String {
        path_url(self.dir.path())
    }

    /// Commit id of `branch`, if it has been pushed.
    pub fn branch_head(&self, branch: &str) -> Option<Oid> {
        self.repo
            .find_reference(&format!("refs/heads/{branch}"))
            .ok()
            .and_then(|r| r.target())
    }
}

fn path_url(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Whether a `git` binary is available for push tests.
pub fn git_available() -> bool {
    which::which("git").is_ok()
}
