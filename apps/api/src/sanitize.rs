//! Text sanitation shared by the job and application write paths. Every
//! free-text field is passed through `strip` before it reaches the store or
//! an outgoing email.

use std::collections::HashSet;

/// Removes `<...>` tag sequences and trims surrounding whitespace.
///
/// A `<` with no closing `>` (and the empty `<>`) is left in place, so prose
/// like "salary < 10 LPA" survives intact.
pub fn strip(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start + 1..].find('>') {
            Some(0) => {
                out.push_str("<>");
                rest = &rest[start + 2..];
            }
            Some(end) => rest = &rest[start + end + 2..],
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Strips each entry, drops empties, and de-duplicates preserving first-seen
/// order.
pub fn uniq<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let cleaned = strip(item.as_ref());
        if cleaned.is_empty() {
            continue;
        }
        if seen.insert(cleaned.clone()) {
            out.push(cleaned);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_tags() {
        assert_eq!(strip("<b>Senior</b> Engineer"), "Senior Engineer");
    }

    #[test]
    fn test_strip_removes_nested_angle_noise() {
        assert_eq!(strip("<a<b>text"), "text");
    }

    #[test]
    fn test_strip_trims_whitespace() {
        assert_eq!(strip("  Pune, India  "), "Pune, India");
    }

    #[test]
    fn test_strip_keeps_lone_angle_bracket() {
        assert_eq!(strip("salary < 10 LPA"), "salary < 10 LPA");
    }

    #[test]
    fn test_strip_keeps_empty_tag_pair() {
        assert_eq!(strip("a <> b"), "a <> b");
    }

    #[test]
    fn test_strip_plain_text_unchanged() {
        assert_eq!(strip("Rust"), "Rust");
    }

    #[test]
    fn test_strip_only_tag_becomes_empty() {
        assert_eq!(strip("<script>"), "");
    }

    #[test]
    fn test_uniq_dedups_preserving_order() {
        let items = ["Rust", "Go", "Rust", "Python"];
        assert_eq!(uniq(items), vec!["Rust", "Go", "Python"]);
    }

    #[test]
    fn test_uniq_drops_empty_after_strip() {
        let items = ["Rust", "", "  ", "<i></i>"];
        assert_eq!(uniq(items), vec!["Rust"]);
    }

    #[test]
    fn test_uniq_strips_entries() {
        let items = [" <b>Rust</b> ", "Rust"];
        assert_eq!(uniq(items), vec!["Rust"]);
    }
}
