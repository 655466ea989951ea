//! Semantic file categories and the analyzer each one dispatches to.

pub mod registry;

use std::fmt;
use std::path::Path;

use crate::analysis::{AnalysisInput, code, document};

pub use registry::{EXTENSION_TABLE, extension_of};

/// Semantic grouping of a file, derived from its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Images,
    Documents,
    Code,
    Config,
    Data,
    Media,
    Archives,
    Other,
}

/// How a category turns a file change into a description.
#[derive(Clone, Copy)]
pub enum Analyzer {
    /// Fixed description built from the file name alone.
    Template(fn(&str) -> String),
    /// Inspects file content. `None` means the content was unusable.
    Content(fn(&AnalysisInput<'_>) -> Option<String>),
    /// No dedicated analyzer; the generic "Update <file>" applies.
    Generic,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Analyzer::Template(_) => f.write_str("Template"),
            Analyzer::Content(_) => f.write_str("Content"),
            Analyzer::Generic => f.write_str("Generic"),
        }
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Code => "code",
            Category::Config => "config",
            Category::Data => "data",
            Category::Media => "media",
            Category::Archives => "archives",
            Category::Other => "other",
        }
    }

    /// The description strategy for this category.
    pub fn analyzer(self) -> Analyzer {
        match self {
            Category::Images => {
                Analyzer::Template(|name: &str| format!("Update image asset: {name}"))
            }
            Category::Documents => Analyzer::Content(document::describe_document),
            Category::Code => Analyzer::Content(code::describe_code),
            Category::Config => {
                Analyzer::Template(|name: &str| format!("Update configuration in {name}"))
            }
            Category::Data => Analyzer::Template(|name: &str| format!("Update data in {name}")),
            Category::Media => {
                Analyzer::Template(|name: &str| format!("Update media file: {name}"))
            }
            Category::Archives => {
                Analyzer::Template(|name: &str| format!("Update archive: {name}"))
            }
            Category::Other => Analyzer::Generic,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorize a path by its (case-insensitive) extension.
///
/// Total and pure: unknown or missing extensions map to [`Category::Other`].
pub fn classify(path: impl AsRef<Path>) -> Category {
    extension_of(path.as_ref())
        .and_then(|ext| registry::lookup(&ext))
        .unwrap_or(Category::Other)
}
