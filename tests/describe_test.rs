//! Integration tests for classification and per-file descriptions.
//!
//! Exercises `classify`, `describe` and the line diff through the public API.

use autocommit::analysis::{
    ChangeKind, FileChange, describe, extract_imports, import_delta, line_diff,
};
use autocommit::category::{Category, EXTENSION_TABLE, classify};

// =============================================================================
// CLASSIFY
// =============================================================================

#[test]
fn test_classify_every_table_extension() {
    for (category, extensions) in EXTENSION_TABLE {
        for ext in *extensions {
            assert_eq!(classify(format!("dir/file.{ext}")), *category, "lowercase .{ext}");
            assert_eq!(
                classify(format!("dir/file.{}", ext.to_uppercase())),
                *category,
                "uppercase .{ext}"
            );
        }
    }
}

#[test]
fn test_classify_unknown_is_other() {
    for path in ["Makefile", "notes.log", "archive.tar.bz2", "src/.env", "weird."] {
        assert_eq!(classify(path), Category::Other, "{path}");
    }
}

#[test]
fn test_classify_is_stable() {
    let first = classify("src/App.TSX");
    for _ in 0..10 {
        assert_eq!(classify("src/App.TSX"), first);
    }
    assert_eq!(first, Category::Code);
}

// =============================================================================
// DESCRIBE
// =============================================================================

fn modified(path: &str, new: &str) -> FileChange {
    FileChange::new(path, ChangeKind::Modified).with_new_content(new)
}

#[test]
fn test_deleted_is_always_remove() {
    for path in ["a/logo.png", "README.md", "package.json", "src/app.py", "settings.ini", "x.bin"] {
        let change = FileChange::new(path, ChangeKind::Deleted);
        let name = path.rsplit('/').next().unwrap();
        assert_eq!(describe(&change), format!("Remove {name}"));
    }
}

#[test]
fn test_template_categories() {
    let cases = [
        ("img/logo.png", "Update image asset: logo.png"),
        ("settings.ini", "Update configuration in settings.ini"),
        ("export.csv", "Update data in export.csv"),
        ("intro.mp4", "Update media file: intro.mp4"),
        ("backup.zip", "Update archive: backup.zip"),
        ("Makefile", "Update Makefile"),
    ];
    for (path, expected) in cases {
        // Templates never look at content.
        assert_eq!(describe(&FileChange::new(path, ChangeKind::Added)), expected);
    }
}

#[test]
fn test_json_manifest_descriptions() {
    assert_eq!(
        describe(&modified("package.json", r#"{"version":"2.0.0"}"#)),
        "Update version to 2.0.0"
    );
    assert_eq!(
        describe(&modified("package.json", r#"{"dependencies":{"x":"1.0.0"}}"#)),
        "Update package dependencies"
    );
    assert_eq!(
        describe(&modified("data.json", "{ not json")),
        "Update documentation: data.json"
    );
}

#[test]
fn test_readme_any_case() {
    for name in ["README.md", "readme.md", "ReadMe.MD"] {
        assert_eq!(describe(&modified(name, "# x")), "Update documentation in README");
    }
    assert_eq!(describe(&modified("guide.md", "# x")), "Update documentation: guide.md");
}

#[test]
fn test_bugfix_keyword_wins() {
    let change = FileChange::new("src/app.js", ChangeKind::Modified)
        .with_old_content("const a = 1;\n")
        .with_new_content("const a = 1;\n// fix: resolve crash\n");
    assert_eq!(describe(&change), "Fix bug in app.js");
}

#[test]
fn test_import_delta_reports_both_sides() {
    let old = "import A from 'a';\nimport B from 'b';\n";
    let new = "import A from 'a';\nimport C from 'c';\n";

    let delta = import_delta(&extract_imports(old), &extract_imports(new));
    let description = delta.describe("app.js").unwrap();
    assert!(description.contains("+c"), "{description}");
    assert!(description.contains("-b"), "{description}");

    let change = FileChange::new("src/app.js", ChangeKind::Modified)
        .with_old_content(old)
        .with_new_content(new);
    assert_eq!(describe(&change), "Update dependencies in app.js (+c-b)");
}

#[test]
fn test_structural_fallbacks_in_order() {
    assert_eq!(
        describe(&modified("user.ts", "export class UserService extends Base {}\nconst api = 1;")),
        "Update UserService implementation in user.ts"
    );
    assert_eq!(
        describe(&modified("routes.py", "app.route('/health')")),
        "Update API implementation in routes.py"
    );
    assert_eq!(
        describe(&modified("login.rb", "check password")),
        "Update security implementation in login.rb"
    );
    assert_eq!(describe(&modified("util.c", "int x;")), "Update code in util.c");
}

#[test]
fn test_unreadable_code_degrades_to_generic() {
    let change = FileChange::new("src/main.cpp", ChangeKind::Modified);
    assert_eq!(describe(&change), "Update main.cpp");
}

// =============================================================================
// LINE DIFF
// =============================================================================

#[test]
fn test_line_diff_positional() {
    assert_eq!(line_diff("a\nb", "a\nc\nd"), "c\nd");
}
