//! Best-effort content loading for file changes.

use std::path::Path;

use tracing::debug;

use super::{ChangeKind, FileChange};

/// Where current and previous file contents come from.
pub trait ContentSource {
    /// Current text of `path`, or `None` if it cannot be read as text.
    fn current(&self, path: &Path) -> Option<String>;

    /// Text of `path` before the pending change, if known.
    fn previous(&self, path: &Path) -> Option<String>;
}

/// Reads the working tree only; no prior content is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkingTree;

impl ContentSource for WorkingTree {
    fn current(&self, path: &Path) -> Option<String> {
        read_text(path)
    }

    fn previous(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Read a file as UTF-8 text.
///
/// Missing files, permission errors, binary files (containing NUL) and invalid
/// UTF-8 all yield `None`.
pub fn read_text(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Cannot read '{}': {}", path.display(), e);
            return None;
        }
    };

    if bytes.contains(&0) {
        debug!("Skipping binary file '{}'", path.display());
        return None;
    }

    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            debug!("'{}' is not valid UTF-8", path.display());
            None
        }
    }
}

/// Build a [`FileChange`] for `path`, reading whatever content is available.
///
/// Deleted paths are never read.
pub fn load_change<S: ContentSource + ?Sized>(
    path: &Path,
    kind: ChangeKind,
    source: &S,
) -> FileChange {
    let mut change = FileChange::new(path, kind);
    if kind != ChangeKind::Deleted {
        change.new_content = source.current(path);
        change.old_content = source.previous(path);
    }
    change
}
