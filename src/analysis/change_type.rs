//! Conventional-commit style change-type detection from diff text.

use std::fmt;

/// Kind of change inferred from keywords such as `fix:` or `feat:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Feature,
    Bugfix,
    Refactor,
    Style,
    Test,
    Docs,
}

/// Keyword table in match priority order. Categories are scanned top to
/// bottom and keywords left to right; the first hit decides.
pub const CHANGE_TYPE_KEYWORDS: &[(ChangeType, &[&str])] = &[
    (ChangeType::Feature, &["feat:", "feature:", "add:", "implement:"]),
    (ChangeType::Bugfix, &["fix:", "bug:", "resolve:", "fixes:"]),
    (ChangeType::Refactor, &["refactor:", "improve:", "update:", "enhance:"]),
    (ChangeType::Style, &["style:", "format:", "lint:"]),
    (ChangeType::Test, &["test:", "spec:", "coverage:"]),
    (ChangeType::Docs, &["docs:", "documentation:", "comment:"]),
];

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Feature => "feature",
            ChangeType::Bugfix => "bugfix",
            ChangeType::Refactor => "refactor",
            ChangeType::Style => "style",
            ChangeType::Test => "test",
            ChangeType::Docs => "docs",
        }
    }

    /// Human-readable summary used as the start of a file description.
    pub fn description(&self) -> &'static str {
        match self {
            ChangeType::Feature => "Add new feature",
            ChangeType::Bugfix => "Fix bug",
            ChangeType::Refactor => "Refactor code",
            ChangeType::Style => "Update code style",
            ChangeType::Test => "Update tests",
            ChangeType::Docs => "Update documentation",
        }
    }

    /// Keywords that select this change type, lowercase.
    pub fn keywords(&self) -> &'static [&'static str] {
        CHANGE_TYPE_KEYWORDS
            .iter()
            .find(|(ty, _)| ty == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the change type signalled by `text`, case-insensitively.
///
/// Returns `None` when no keyword of any change type occurs in the text.
pub fn detect_change_type(text: &str) -> Option<ChangeType> {
    let haystack = text.to_lowercase();

    CHANGE_TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| haystack.contains(keyword)))
        .map(|(ty, _)| *ty)
}
