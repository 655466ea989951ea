//! Import/include target extraction for the supported code languages.
//!
//! Recognised forms, checked line by line:
//! - JavaScript/TypeScript: `import .. from 'x'`, `import 'x'`, `export .. from 'x'`,
//!   `import('x')`, `require('x')`
//! - Python: `import a, b.c`, `from x import y`
//! - Java: `import a.b.C;`, `import static a.b.C.m;`
//! - C/C++: `#include <x>`, `#include "x"`
//! - C#: `using A.B;`
//! - PHP: `use A\B;`, `require_once 'x'`, `include 'x'`
//! - Ruby: `require 'x'`, `require_relative 'x'`
//! - CSS/SCSS: `@import 'x'`, `@use 'x'`, `@forward 'x'`
//! - HTML: `<script src="x">`, `<link href="x">`

use std::sync::LazyLock;

use regex_lite::Regex;

/// Patterns whose first capture is a quoted or bracketed target. Every match
/// on a line counts.
static QUOTED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"^@(?:import|use|forward)\s+(?:url\()?\s*['"]([^'"]+)['"]"#,
        r#"^(?:(?:import|export)\b.*?|\}\s*)\bfrom\s+['"]([^'"]+)['"]"#,
        r#"^import\s+['"]([^'"]+)['"]"#,
        r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
        r#"\b(?:require|require_once|require_relative|include|include_once)\s*\(?\s*['"]([^'"]+)['"]"#,
        r#"^#\s*include\s*[<"]([^>"]+)[>"]"#,
        r#"<script\b[^>]*\bsrc\s*=\s*['"]([^'"]+)['"]"#,
        r#"<link\b[^>]*\bhref\s*=\s*['"]([^'"]+)['"]"#,
    ])
});

/// Bare module paths, tried only when no quoted form matched the line. The
/// first matching pattern wins.
static JAVA_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| single(r"^import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;"));
static PYTHON_FROM: LazyLock<Regex> = LazyLock::new(|| single(r"^from\s+([\w.]+)\s+import\b"));
static PYTHON_IMPORT: LazyLock<Regex> = LazyLock::new(|| single(r"^import\s+([\w.][\w.\s,]*)"));
static CSHARP_USING: LazyLock<Regex> =
    LazyLock::new(|| single(r"^using\s+(?:static\s+)?([\w.]+)\s*;"));
static PHP_USE: LazyLock<Regex> = LazyLock::new(|| single(r"^use\s+([\w\\]+)"));

fn single(pattern: &str) -> Regex {
    Regex::new(pattern).expect("import pattern is a valid regex")
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| single(p)).collect()
}

/// Unique import targets in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    targets: Vec<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target, returning `false` if it was already present.
    pub fn insert(&mut self, target: impl Into<String>) -> bool {
        let target = target.into();
        if self.contains(&target) {
            return false;
        }
        self.targets.push(target);
        true
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.iter().any(|t| t == target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ImportSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ImportSet::new();
        for target in iter {
            set.insert(target);
        }
        set
    }
}

/// Extract the import targets of a source file.
pub fn extract_imports(content: &str) -> ImportSet {
    let mut imports = ImportSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut quoted = false;
        for pattern in QUOTED_PATTERNS.iter() {
            for caps in pattern.captures_iter(line) {
                if let Some(target) = caps.get(1) {
                    imports.insert(target.as_str());
                    quoted = true;
                }
            }
        }
        if quoted {
            continue;
        }

        for target in bare_targets(line) {
            imports.insert(target);
        }
    }

    imports
}

/// Module paths from unquoted import statements on one line.
fn bare_targets(line: &str) -> Vec<String> {
    if let Some(caps) = JAVA_IMPORT.captures(line) {
        return vec![caps[1].to_string()];
    }
    if let Some(caps) = PYTHON_FROM.captures(line) {
        return vec![caps[1].to_string()];
    }
    if let Some(caps) = PYTHON_IMPORT.captures(line) {
        // `import a, b.c as d` names several modules; aliases are dropped.
        return caps[1]
            .split(',')
            .filter_map(|part| part.split_whitespace().next())
            .map(str::to_string)
            .collect();
    }
    if let Some(caps) = CSHARP_USING.captures(line) {
        return vec![caps[1].to_string()];
    }
    if let Some(caps) = PHP_USE.captures(line) {
        return vec![caps[1].to_string()];
    }
    Vec::new()
}

/// Imports gained and lost between two versions of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ImportDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// `Update dependencies in <file> (+a, b-c)`, or `None` when nothing changed.
    pub fn describe(&self, filename: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut detail = String::new();
        if !self.added.is_empty() {
            detail.push('+');
            detail.push_str(&self.added.join(", "));
        }
        if !self.removed.is_empty() {
            detail.push('-');
            detail.push_str(&self.removed.join(", "));
        }

        Some(format!("Update dependencies in {filename} ({detail})"))
    }
}

/// Compute `new - old` and `old - new`, each in order of appearance.
pub fn import_delta(old: &ImportSet, new: &ImportSet) -> ImportDelta {
    ImportDelta {
        added: new
            .iter()
            .filter(|t| !old.contains(t))
            .map(str::to_string)
            .collect(),
        removed: old
            .iter()
            .filter(|t| !new.contains(t))
            .map(str::to_string)
            .collect(),
    }
}
