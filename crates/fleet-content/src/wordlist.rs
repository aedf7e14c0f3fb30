//! Sorted-set-of-lines adapter
//!
//! Dictionary-style files where ordering and case carry no meaning. The
//! normalized form lowercases every line, removes duplicates by case-folded
//! value, and sorts ascending with a trailing newline.

use std::collections::BTreeSet;

/// What to do with `#`-prefixed lines during normalization.
///
/// The fleet disagrees on this point: some word lists strip comments, others
/// fold them into the sorted output. Both variants are supported; the policy
/// layer picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPolicy {
    /// Comment lines go through the same lowercase/sort pipeline.
    Preserve,
    /// Comment lines are removed before normalization.
    Strip,
}

/// Normalize a line-oriented set document.
pub fn normalize(raw: &str, comments: CommentPolicy) -> String {
    let lines: BTreeSet<String> = raw
        .lines()
        .filter(|line| comments == CommentPolicy::Preserve || !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect();

    let mut out = lines.into_iter().collect::<Vec<_>>().join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_sorts_lowercases_and_dedupes() {
        assert_eq!(normalize("B\na\na\n", CommentPolicy::Strip), "a\nb\n");
    }

    #[test]
    fn test_dedupe_is_case_folded() {
        assert_eq!(normalize("Word\nword\nWORD\n", CommentPolicy::Strip), "word\n");
    }

    #[test]
    fn test_strip_removes_comment_lines() {
        assert_eq!(
            normalize("# header\nzebra\napple\n", CommentPolicy::Strip),
            "apple\nzebra\n"
        );
    }

    #[test]
    fn test_preserve_folds_comments_into_the_set() {
        assert_eq!(
            normalize("# Header\nzebra\n", CommentPolicy::Preserve),
            "# header\nzebra\n"
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_added() {
        assert_eq!(normalize("b\na", CommentPolicy::Strip), "a\nb\n");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "[a-zA-Z# ]{0,40}(\n[a-zA-Z# ]{0,40}){0,10}") {
            let once = normalize(&raw, CommentPolicy::Strip);
            prop_assert_eq!(normalize(&once, CommentPolicy::Strip), once);
        }

        #[test]
        fn prop_output_is_sorted_and_unique(raw in "[a-zA-Z]{1,20}(\n[a-zA-Z]{1,20}){0,10}") {
            let normalized = normalize(&raw, CommentPolicy::Strip);
            let lines: Vec<&str> = normalized.lines().collect();
            let mut sorted = lines.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(lines, sorted);
        }
    }
}
