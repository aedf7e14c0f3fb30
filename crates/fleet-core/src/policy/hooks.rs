//! Hook-list reconciliation policy
//!
//! The template owns each entry's structure (the hook list itself); the
//! repository owns the pinned revision, and for two well-known hooks also
//! the extra dependency pins. Exception-listed identifiers are never merged.

use serde_yaml::{Mapping, Value};

use fleet_content::hooklist;

use crate::error::Result;
use crate::outcome::Outcome;

/// Hook identifier suffixes whose `additional_dependencies` stay
/// repository-owned: the template cannot know which type stubs or plugins
/// each repository needs.
const REPO_OWNED_DEPS: [&str; 2] = ["mypy.git", "pylint.git"];

/// Merge the template's hook list with the repository's, entry by entry.
pub fn reconcile(template: &str, current: Option<&str>, exceptions: &[String]) -> Result<Outcome> {
    let template_doc = hooklist::load(template)?;
    let mut warnings = Vec::new();

    let repo_doc = match current {
        Some(raw) => hooklist::load(raw)?,
        None => {
            warnings.push("Hook configuration not found, merging against an empty document".to_string());
            Value::Null
        }
    };
    let repo_entries = hooklist::entries(&repo_doc);

    let mut merged = Vec::new();
    for entry in hooklist::entries(&template_doc) {
        let Some(uri) = hooklist::entry_uri(&entry).map(str::to_string) else {
            merged.push(entry);
            continue;
        };

        let matches = hooklist::find_matches(&repo_entries, &uri);
        if matches.len() > 1 {
            warnings.push(format!("Multiple entries for {uri}"));
            merged.push(matches[0].clone());
            continue;
        }

        let found = match matches.first() {
            Some(found) => (*found).clone(),
            None => {
                warnings.push(format!("Entry not found for {uri}"));
                entry.clone()
            }
        };

        if exceptions.iter().any(|skip| skip == &uri) {
            merged.push(found);
            continue;
        }

        merged.push(merge_entry(&entry, &found, &uri));
    }

    // Explicitly excepted entries are never silently dropped: re-attach the
    // ones the template does not carry.
    for uri in exceptions {
        let present = merged
            .iter()
            .any(|entry| hooklist::entry_uri(entry) == Some(uri.as_str()));
        if present {
            continue;
        }
        if let Some(kept) = repo_entries
            .iter()
            .find(|entry| hooklist::entry_uri(entry) == Some(uri.as_str()))
        {
            merged.push(kept.clone());
        }
    }

    let desired_doc = hooklist::with_entries(&template_doc, merged);
    let desired = hooklist::dump(&desired_doc)?;
    Ok(Outcome::classify(current.unwrap_or(""), desired, warnings))
}

/// Desired entry: template structure, repository pinned revision, and for
/// the repository-owned hooks the repository's `additional_dependencies`.
fn merge_entry(template_entry: &Value, found: &Value, uri: &str) -> Value {
    let mut entry = Mapping::new();
    entry.insert(Value::from("repo"), Value::from(uri));

    if let Some(rev) = found.get("rev").or_else(|| template_entry.get("rev")) {
        entry.insert(Value::from("rev"), rev.clone());
    }

    let mut hooks = template_entry
        .get("hooks")
        .cloned()
        .unwrap_or(Value::Sequence(Vec::new()));

    if REPO_OWNED_DEPS.iter().any(|suffix| uri.ends_with(suffix))
        && let Some(deps) = found
            .get("hooks")
            .and_then(|repo_hooks| repo_hooks.get(0))
            .and_then(|hook| hook.get("additional_dependencies"))
        && let Some(Value::Mapping(first)) = hooks.get_mut(0)
    {
        first.insert(Value::from("additional_dependencies"), deps.clone());
    }

    entry.insert(Value::from("hooks"), hooks);
    Value::Mapping(entry)
}
