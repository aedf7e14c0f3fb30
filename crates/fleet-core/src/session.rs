//! Run session identity and branch naming

use chrono::Utc;

/// Process-wide run identity.
///
/// The id namespaces branch names so repeated runs against the same fork
/// never collide. Created once at process start, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunSession {
    id: String,
    dry_run: bool,
}

impl RunSession {
    pub fn new(dry_run: bool) -> Self {
        Self {
            id: Utc::now().format("%y%m%d-%H%M%S").to_string(),
            dry_run,
        }
    }

    /// Session with a fixed id, for deterministic branch names in tests.
    pub fn with_id(id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            id: id.into(),
            dry_run,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Branch name for one tracked file in this session.
    pub fn branch_name(&self, file: &str) -> String {
        format!("chore/file_{file}_{}", self.id)
    }
}
