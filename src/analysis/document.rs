//! Document descriptions, including package manifest sniffing for JSON files.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::category::extension_of;

use super::AnalysisInput;

/// The manifest fields worth reporting. Anything else in the file is ignored.
#[derive(Debug, Deserialize)]
struct ManifestFields {
    version: Option<Value>,
    dependencies: Option<Value>,
    #[serde(rename = "devDependencies")]
    dev_dependencies: Option<Value>,
}

/// Describe a document change.
///
/// `README.md` gets a fixed description. JSON files are parsed for a
/// `version` or dependency table; anything else, including malformed JSON,
/// is reported as a generic documentation update. Returns `None` only when a
/// JSON file's content could not be read.
pub fn describe_document(input: &AnalysisInput<'_>) -> Option<String> {
    let filename = input.filename;

    if filename.to_lowercase() == "readme.md" {
        return Some("Update documentation in README".to_string());
    }

    if extension_of(Path::new(filename)).as_deref() == Some("json") {
        let content = input.new_content?;
        if let Some(description) = describe_json(content) {
            return Some(description);
        }
    }

    Some(format!("Update documentation: {filename}"))
}

/// Sniff a JSON document for a version bump or dependency change.
pub fn describe_json(content: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            debug!("Invalid JSON, using generic description: {}", e);
            return None;
        }
    };

    // Arrays would otherwise deserialize positionally into the struct.
    if !value.is_object() {
        return None;
    }
    let fields: ManifestFields = serde_json::from_value(value).ok()?;

    if let Some(version) = fields.version.as_ref().filter(|v| is_truthy(v)) {
        let version = match version {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Some(format!("Update version to {version}"));
    }

    let has_dependencies = [&fields.dependencies, &fields.dev_dependencies]
        .into_iter()
        .flatten()
        .any(is_truthy);
    if has_dependencies {
        return Some("Update package dependencies".to_string());
    }

    None
}

/// JSON truthiness: null, false, 0 and "" are absent values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
