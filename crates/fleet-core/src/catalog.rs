//! Static catalog of tracked repositories and files
//!
//! Plain configuration data injected into the run coordinator at startup.
//! The built-in catalog mirrors the production fleet; a TOML file with the
//! same shape can replace it wholesale.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One tracked repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSpec {
    pub name: String,
    /// Fork slug with an `{origin_org}` placeholder, e.g. `{origin_org}/molecule`.
    pub origin: String,
    /// Upstream slug, e.g. `ansible/molecule`.
    pub upstream: String,
}

impl RepoSpec {
    /// Origin slug with the fork-target organization substituted.
    pub fn origin_for(&self, origin_org: &str) -> String {
        self.origin.replace("{origin_org}", origin_org)
    }
}

/// A file synced by verbatim template replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullFile {
    /// Template source name; a leading `__` is stripped for the deployed name.
    pub name: String,
    /// Repositories where this file needs manual handling.
    #[serde(default)]
    pub skip: Vec<String>,
}

impl FullFile {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            skip: Vec::new(),
        }
    }

    fn with_skip(name: &str, skip: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            skip: skip.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The catalog of tracked repositories and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub sorted_files: Vec<String>,
    pub hook_file: String,
    pub project_file: String,
    pub repos: Vec<RepoSpec>,
    pub full_files: Vec<FullFile>,
    /// Repository name to hook identifiers exempt from merging.
    #[serde(default)]
    pub hook_exceptions: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// The production fleet.
    pub fn builtin() -> Self {
        let repos = [
            "ansible-creator",
            "ansible-dev-environment",
            "ansible-dev-tools",
            "molecule",
            "pytest-ansible",
            "tox-ansible",
        ]
        .into_iter()
        .map(|name| RepoSpec {
            name: name.to_string(),
            origin: format!("{{origin_org}}/{name}"),
            upstream: format!("ansible/{name}"),
        })
        .collect();

        let full_files = vec![
            FullFile::with_skip(".flake8", &["pytest-ansible", "molecule"]),
            FullFile::new(".github/CODE_OF_CONDUCT.md"),
            FullFile::new(".github/CODEOWNERS"),
            FullFile::with_skip(".github/dependabot.yml", &["ansible-dev-tools"]),
            FullFile::new(".github/release-drafter.yml"),
            FullFile::new(".github/workflows/ack.yml"),
            FullFile::new(".github/workflows/push.yml"),
            FullFile::new(".github/workflows/tox.yml"),
            FullFile::new(".readthedocs.yml"),
            FullFile::new(".vscode/extensions.json"),
            FullFile::new(".vscode/settings.json"),
            FullFile::new("codecov.yml"),
            FullFile::new("__cspell.config.yaml"),
            FullFile::new("tox.ini"),
        ];

        let hook_exceptions = BTreeMap::from([
            (
                "ansible-dev-tools".to_string(),
                vec!["https://github.com/jazzband/pip-tools".to_string()],
            ),
            (
                "molecule".to_string(),
                vec!["https://github.com/ansible/ansible-lint".to_string()],
            ),
        ]);

        Self {
            repos,
            full_files,
            sorted_files: vec![".config/dictionary.txt".to_string()],
            hook_file: ".pre-commit-config.yaml".to_string(),
            hook_exceptions,
            project_file: "pyproject.toml".to_string(),
        }
    }

    /// Load a catalog override from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Hook identifiers exempt from merging for one repository.
    pub fn hook_exceptions_for(&self, repo: &str) -> &[String] {
        self.hook_exceptions
            .get(repo)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
