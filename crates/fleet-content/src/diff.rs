//! Drift classification and unified diff rendering

use similar::TextDiff;

/// Context lines shown around each change in rendered diffs
const CONTEXT_LINES: usize = 5;

/// Result of comparing current against desired content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// Contents are byte-identical
    Unchanged,
    /// Contents differ; carries the rendered unified diff
    Changed(String),
}

impl Drift {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Compare current and desired content.
///
/// Equality is exact string equality; normalization is the adapters' job,
/// so a trailing-whitespace or key-order difference showing up here is an
/// adapter bug.
pub fn classify(current: &str, desired: &str) -> Drift {
    if current == desired {
        return Drift::Unchanged;
    }

    let text_diff = TextDiff::from_lines(current, desired);
    let mut unified = text_diff.unified_diff();
    let rendered = unified
        .context_radius(CONTEXT_LINES)
        .header("current", "desired")
        .to_string();

    Drift::Changed(rendered)
}
