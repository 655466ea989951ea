//! Source code descriptions.
//!
//! A code change is described by the first rule in [`CODE_RULES`] that has
//! something to say, falling back to `Update code in <file>`.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use super::AnalysisInput;
use super::change_type::detect_change_type;
use super::diff::line_diff;
use super::imports::{ImportSet, extract_imports, import_delta};

static CLASS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)").expect("class pattern is a valid regex")
});

/// What the rules see of one code change.
#[derive(Debug, Clone, Copy)]
pub struct CodeChange<'a> {
    pub filename: &'a str,
    /// Current file content.
    pub content: &'a str,
    /// Content before the change, when known.
    pub old_content: Option<&'a str>,
}

impl CodeChange<'_> {
    /// Text scanned for change-type keywords: the positional line diff when
    /// both versions are non-empty, otherwise the whole current content.
    pub fn diff_text(&self) -> String {
        let diff = match self.old_content {
            Some(old) if !old.is_empty() && !self.content.is_empty() => {
                line_diff(old, self.content)
            }
            _ => String::new(),
        };

        if diff.is_empty() {
            self.content.to_string()
        } else {
            diff
        }
    }
}

/// One step of the description chain.
pub struct CodeRule {
    pub name: &'static str,
    pub describe: fn(&CodeChange<'_>) -> Option<String>,
}

/// Description rules in priority order; the first `Some` wins.
pub const CODE_RULES: &[CodeRule] = &[
    CodeRule { name: "change-type", describe: change_type_rule },
    CodeRule { name: "imports", describe: imports_rule },
    CodeRule { name: "class", describe: class_rule },
    CodeRule { name: "api", describe: api_rule },
    CodeRule { name: "security", describe: security_rule },
];

/// Describe a code change. Returns `None` when the current content is unavailable.
pub fn describe_code(input: &AnalysisInput<'_>) -> Option<String> {
    let change = CodeChange {
        filename: input.filename,
        content: input.new_content?,
        old_content: input.old_content,
    };

    Some(describe_code_change(&change))
}

/// Run the rule chain over a code change.
pub fn describe_code_change(change: &CodeChange<'_>) -> String {
    for rule in CODE_RULES {
        if let Some(description) = (rule.describe)(change) {
            debug!("{}: matched '{}' rule", change.filename, rule.name);
            return description;
        }
    }

    format!("Update code in {}", change.filename)
}

fn change_type_rule(change: &CodeChange<'_>) -> Option<String> {
    let change_type = detect_change_type(&change.diff_text())?;
    Some(format!("{} in {}", change_type.description(), change.filename))
}

fn imports_rule(change: &CodeChange<'_>) -> Option<String> {
    let old = change
        .old_content
        .map(extract_imports)
        .unwrap_or_else(ImportSet::new);
    let new = extract_imports(change.content);

    import_delta(&old, &new).describe(change.filename)
}

fn class_rule(change: &CodeChange<'_>) -> Option<String> {
    if !(change.content.contains("class") && change.content.contains("extends")) {
        return None;
    }

    let class_name = extract_class_name(change.content).unwrap_or("class");
    Some(format!("Update {} implementation in {}", class_name, change.filename))
}

fn api_rule(change: &CodeChange<'_>) -> Option<String> {
    contains_any(change.content, &["api", "endpoint", "route"])
        .then(|| format!("Update API implementation in {}", change.filename))
}

fn security_rule(change: &CodeChange<'_>) -> Option<String> {
    contains_any(change.content, &["security", "auth", "password", "encrypt"])
        .then(|| format!("Update security implementation in {}", change.filename))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Words that can follow `class` in prose or comments but never name one.
const NOT_CLASS_NAMES: &[&str] = &["extends", "implements"];

/// First identifier following the `class` keyword that is not itself a keyword.
pub fn extract_class_name(content: &str) -> Option<&str> {
    CLASS_NAME
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|name| !NOT_CLASS_NAMES.contains(name))
}
