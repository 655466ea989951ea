//! Commit message composition from per-file descriptions.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::analysis::{ContentSource, FileChange, describe, load_change};

use super::batch::ChangeBatch;

/// First line of a message summarizing more than one description.
pub const MULTIPLE_UPDATES_HEADER: &str = "Multiple updates:";

/// Marker in front of each description in a multi-line message.
pub const BULLET: &str = "• ";

/// A finished commit message and the unique descriptions it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    text: String,
    descriptions: Vec<String>,
}

impl CommitMessage {
    /// Build a message from descriptions, dropping exact duplicates while
    /// keeping first occurrences in order.
    ///
    /// Returns `None` if there are no descriptions.
    pub fn from_descriptions<I>(descriptions: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = descriptions
            .into_iter()
            .map(Into::into)
            .filter(|d| seen.insert(d.clone()))
            .collect();

        let text = match unique.as_slice() {
            [] => return None,
            [only] => only.clone(),
            many => {
                let mut lines = vec![MULTIPLE_UPDATES_HEADER.to_string()];
                lines.extend(many.iter().map(|d| format!("{BULLET}{d}")));
                lines.join("\n")
            }
        };

        Some(Self {
            text,
            descriptions: unique,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Unique descriptions in message order.
    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn is_multi_line(&self) -> bool {
        self.descriptions.len() > 1
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for CommitMessage {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Summarize already-loaded file changes.
pub fn summarize_changes(changes: &[FileChange]) -> Option<CommitMessage> {
    CommitMessage::from_descriptions(changes.iter().map(describe))
}

/// Summarize a batch, reading file content through `source`.
///
/// Each path is described independently; a path whose content cannot be read
/// gets a filename-only description and never affects the others. Returns
/// `None` for an empty batch.
pub fn summarize<S: ContentSource + ?Sized>(
    batch: &ChangeBatch,
    source: &S,
) -> Option<CommitMessage> {
    let descriptions = batch.iter().map(|(path, kind)| {
        let description = describe(&load_change(path, kind, source));
        debug!("{} ({}): {}", path.display(), kind, description);
        description
    });

    CommitMessage::from_descriptions(descriptions)
}
