//! Extension to category lookup table.

use std::path::Path;

use super::Category;

const IMAGES: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "ico"];

const DOCUMENTS: &[&str] = &["pdf", "doc", "docx", "txt", "md", "json", "xml", "yaml", "yml"];

const CODE: &[&str] = &[
    "js", "jsx", "ts", "tsx", "html", "css", "scss", "py", "java", "cpp", "c", "cs", "php", "rb",
];

const CONFIG: &[&str] = &["env", "config", "ini", "conf"];

const DATA: &[&str] = &["csv", "xlsx", "xls", "db", "sqlite"];

const MEDIA: &[&str] = &["mp4", "mp3", "wav", "avi", "mov"];

const ARCHIVES: &[&str] = &["zip", "rar", "7z", "tar", "gz"];

/// Every known extension (lowercase, without the dot) grouped by the category
/// that owns it. No extension appears under more than one category.
pub const EXTENSION_TABLE: &[(Category, &[&str])] = &[
    (Category::Images, IMAGES),
    (Category::Documents, DOCUMENTS),
    (Category::Code, CODE),
    (Category::Config, CONFIG),
    (Category::Data, DATA),
    (Category::Media, MEDIA),
    (Category::Archives, ARCHIVES),
];

/// Lowercased extension of `path`, without the leading dot.
///
/// Follows [`Path::extension`]: a bare dotfile such as `.env` has no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Find the category owning a lowercase extension.
pub(crate) fn lookup(extension: &str) -> Option<Category> {
    EXTENSION_TABLE
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension))
        .map(|(category, _)| *category)
}
