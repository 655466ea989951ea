//! Positional line diff.
//!
//! Lines are compared by index, not aligned: an insertion or deletion near the
//! top of a file shifts every later line, so everything after the edit is
//! reported as changed. Good enough for keyword sniffing, not for display.

/// Lines of `new_lines` that differ from the line at the same index in
/// `old_lines`. Indices past the end of `old_lines` always count as changed.
pub fn changed_lines<'a>(old_lines: &[&str], new_lines: &[&'a str]) -> Vec<&'a str> {
    new_lines
        .iter()
        .enumerate()
        .filter(|(i, line)| old_lines.get(*i) != Some(*line))
        .map(|(_, line)| *line)
        .collect()
}

/// Diff text for two file contents: the changed lines of `new`, joined by `\n`.
pub fn line_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();

    changed_lines(&old_lines, &new_lines).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_and_appended_lines() {
        assert_eq!(changed_lines(&["a", "b"], &["a", "c", "d"]), vec!["c", "d"]);
        assert_eq!(line_diff("a\nb", "a\nc\nd"), "c\nd");
    }

    #[test]
    fn test_identical_content_has_empty_diff() {
        assert_eq!(line_diff("one\ntwo\n", "one\ntwo\n"), "");
    }

    #[test]
    fn test_removed_lines_are_not_reported() {
        assert_eq!(line_diff("a\nb\nc", "a\nb"), "");
    }

    #[test]
    fn test_insertion_shifts_following_lines() {
        // Inserting "x" at the top marks every line after it as changed.
        assert_eq!(line_diff("a\nb", "x\na\nb"), "x\na\nb");
    }
}
