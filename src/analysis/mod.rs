//! Per-file change descriptions.
//!
//! [`describe`] turns one [`FileChange`] into a single human-readable line by
//! dispatching on the file's [`Category`]. Nothing here fails: unreadable or
//! unparseable content degrades to a filename-only description.

pub mod change_type;
pub mod code;
pub mod content;
pub mod diff;
pub mod document;
pub mod imports;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::category::{Analyzer, Category, classify};

pub use change_type::{ChangeType, detect_change_type};
pub use content::{ContentSource, WorkingTree, load_change, read_text};
pub use diff::line_diff;
pub use imports::{ImportDelta, ImportSet, extract_imports, import_delta};

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "Added"),
            ChangeKind::Modified => write!(f, "Modified"),
            ChangeKind::Deleted => write!(f, "Deleted"),
        }
    }
}

/// One file change together with whatever content could be read for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
    /// Current content; `None` if deleted, binary or unreadable.
    pub new_content: Option<String>,
    /// Content before the change, when known.
    pub old_content: Option<String>,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            new_content: None,
            old_content: None,
        }
    }

    pub fn with_new_content(mut self, content: impl Into<String>) -> Self {
        self.new_content = Some(content.into());
        self
    }

    pub fn with_old_content(mut self, content: impl Into<String>) -> Self {
        self.old_content = Some(content.into());
        self
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// What a content analyzer gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub filename: &'a str,
    pub new_content: Option<&'a str>,
    pub old_content: Option<&'a str>,
}

/// Final path component, lossily converted; the whole path if there is none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Filename-only description used whenever analysis is impossible.
pub fn generic_description(filename: &str) -> String {
    format!("Update {filename}")
}

/// Describe one file change.
///
/// Deletions short-circuit to `Remove <file>` regardless of category.
pub fn describe(change: &FileChange) -> String {
    let filename = change.file_name();

    if change.kind == ChangeKind::Deleted {
        return format!("Remove {filename}");
    }

    describe_content(
        classify(&change.path),
        &filename,
        change.new_content.as_deref(),
        change.old_content.as_deref(),
    )
}

/// Describe a non-deleted file of a known category from its content.
pub fn describe_content(
    category: Category,
    filename: &str,
    new_content: Option<&str>,
    old_content: Option<&str>,
) -> String {
    match category.analyzer() {
        Analyzer::Template(render) => render(filename),
        Analyzer::Content(analyze) => {
            let input = AnalysisInput {
                filename,
                new_content,
                old_content,
            };
            analyze(&input).unwrap_or_else(|| {
                debug!("{}: content unavailable, using generic description", filename);
                generic_description(filename)
            })
        }
        Analyzer::Generic => generic_description(filename),
    }
}
