//! Reconciliation policies, one per tracked-file category
//!
//! Policies are pure: desired content is a deterministic function of the
//! template, the repository's current content, and the exception set. No
//! state leaks between repositories reconciling the same file.

pub mod full;
pub mod hooks;
pub mod project;
pub mod sorted;
