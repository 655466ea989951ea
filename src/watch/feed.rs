//! Filesystem change feed built on `notify`.

use std::path::{Component, Path, PathBuf};

use git2::Repository;
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::warn;

use crate::analysis::ChangeKind;
use crate::error::WatchError;

/// Capacity of the event channel between the watcher thread and the session.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A single file-level change reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Handle to a running feed. Dropping it stops the OS watcher.
pub struct FeedHandle {
    _watcher: RecommendedWatcher,
}

/// Start a recursive watcher on `root`.
///
/// Returns a `FeedHandle` (must be kept alive) and a receiver of classified
/// `ChangeEvent`s. The watcher callback runs on notify's own thread. When
/// `root` is a git work tree, paths its ignore rules exclude are dropped.
pub fn start_feed(root: &Path) -> Result<(FeedHandle, mpsc::Receiver<ChangeEvent>), WatchError> {
    let (tx, rx) = mpsc::channel::<ChangeEvent>(EVENT_CHANNEL_CAPACITY);
    let filter_root = root.to_path_buf();
    let ignore_rules = Repository::open(root).ok();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                for change in classify_event(&event, &filter_root) {
                    let git_ignored = ignore_rules
                        .as_ref()
                        .is_some_and(|repo| is_git_ignored(repo, &change.path, &filter_root));
                    if git_ignored {
                        continue;
                    }
                    if tx.blocking_send(change).is_err() {
                        return; // receiver dropped, shutdown
                    }
                }
            }
            Err(err) => warn!("File watcher error: {}", err),
        }
    })
    .map_err(WatchError::WatcherFailed)?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(WatchError::WatcherFailed)?;

    Ok((FeedHandle { _watcher: watcher }, rx))
}

/// Translate a raw notify event into file changes.
///
/// Directories, metadata-only and access events are dropped, as is anything
/// under a dot-prefixed component (dotfiles, `.git`).
pub fn classify_event(event: &Event, root: &Path) -> Vec<ChangeEvent> {
    let kinds: Vec<(&PathBuf, ChangeKind)> = match &event.kind {
        EventKind::Create(CreateKind::Folder) => Vec::new(),
        EventKind::Create(_) => with_kind(&event.paths, ChangeKind::Added),
        EventKind::Remove(RemoveKind::Folder) => Vec::new(),
        EventKind::Remove(_) => with_kind(&event.paths, ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(ModifyKind::Name(mode)) => rename_changes(*mode, &event.paths),
        EventKind::Modify(_) => with_kind(&event.paths, ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    };

    kinds
        .into_iter()
        .filter(|(path, kind)| *kind == ChangeKind::Deleted || !path.is_dir())
        .filter(|(path, _)| !is_ignored(path, root))
        .map(|(path, kind)| ChangeEvent::new(path.clone(), kind))
        .collect()
}

fn with_kind(paths: &[PathBuf], kind: ChangeKind) -> Vec<(&PathBuf, ChangeKind)> {
    paths.iter().map(|p| (p, kind)).collect()
}

fn rename_changes(mode: RenameMode, paths: &[PathBuf]) -> Vec<(&PathBuf, ChangeKind)> {
    match mode {
        RenameMode::From => with_kind(paths, ChangeKind::Deleted),
        RenameMode::To => with_kind(paths, ChangeKind::Added),
        RenameMode::Both => match paths {
            [from, to, ..] => vec![(from, ChangeKind::Deleted), (to, ChangeKind::Added)],
            _ => Vec::new(),
        },
        // Backend could not tell which side this is; the filesystem can.
        RenameMode::Any | RenameMode::Other => paths
            .iter()
            .map(|p| {
                let kind = if p.exists() {
                    ChangeKind::Added
                } else {
                    ChangeKind::Deleted
                };
                (p, kind)
            })
            .collect(),
    }
}

/// Whether any component of `path` below `root` starts with a dot.
pub fn is_ignored(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Whether the repository's ignore rules exclude `path`.
///
/// Unreadable ignore files count as "not ignored"; the commit step applies
/// the same rules again.
pub fn is_git_ignored(repo: &Repository, path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    repo.is_path_ignored(relative).unwrap_or(false)
}
