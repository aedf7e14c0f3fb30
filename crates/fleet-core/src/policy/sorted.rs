//! Sorted-set policy: a file's canonical form is its own normalized content

use fleet_content::wordlist::{self, CommentPolicy};

use crate::outcome::Outcome;

/// Normalize the repository's own word-list content; the template plays no
/// part. Comment lines are stripped.
///
/// Returns `None` when the file is absent: absence is an operator problem,
/// not a drift to fix automatically.
pub fn reconcile(current: Option<&str>) -> Option<Outcome> {
    let raw = current?;
    Some(Outcome::classify(
        raw,
        wordlist::normalize(raw, CommentPolicy::Strip),
        Vec::new(),
    ))
}
