//! Full-replacement policy: the template is authoritative

use fleet_content::plain;

use crate::outcome::Outcome;

/// Desired content is the template verbatim. A missing repository file is
/// treated as empty so it shows up as drift rather than an error.
pub fn reconcile(template: &str, current: Option<&str>) -> Outcome {
    Outcome::classify(current.unwrap_or(""), plain::dump(template), Vec::new())
}
