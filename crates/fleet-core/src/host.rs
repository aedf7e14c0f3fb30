//! Collaborator contracts consumed by the workflow and coordinator
//!
//! Trait objects keep the engine testable: production implementations shell
//! out through fleet-git and the terminal, tests record calls. Every
//! operation may fail; failures are reported, never retried.

use std::path::Path;

use crate::error::Result;

/// Version-control side of one repository's units of work.
pub trait RepoHost {
    fn name(&self) -> &str;
    fn work_dir(&self) -> &Path;

    /// Clone the fork into the scratch root.
    fn clone_origin(&self) -> Result<()>;
    /// Clone the upstream repository into the scratch root.
    fn clone_upstream(&self) -> Result<()>;
    /// Ensure a fork of the upstream repository exists.
    fn fork(&self) -> Result<()>;
    /// Reset the working copy's main branch to the upstream state.
    fn ensure_main(&self) -> Result<()>;
    /// Create a branch at HEAD and check it out.
    fn create_branch(&self, name: &str) -> Result<()>;
    /// Stage one file.
    fn stage(&self, file: &str) -> Result<()>;
    /// Commit the staged changes with the message read from `message_file`.
    fn commit(&self, message_file: &Path) -> Result<()>;
    /// Push a branch to the fork.
    fn push(&self, branch: &str) -> Result<()>;
    /// Open a pull request against upstream for one updated file.
    fn open_pull_request(&self, file: &str, branch: &str, message_file: &Path) -> Result<()>;
}

impl RepoHost for fleet_git::RepoClient {
    fn name(&self) -> &str {
        self.name()
    }

    fn work_dir(&self) -> &Path {
        self.work_dir()
    }

    fn clone_origin(&self) -> Result<()> {
        Ok(self.clone_origin()?)
    }

    fn clone_upstream(&self) -> Result<()> {
        Ok(self.clone_upstream()?)
    }

    fn fork(&self) -> Result<()> {
        Ok(self.fork()?)
    }

    fn ensure_main(&self) -> Result<()> {
        Ok(self.ensure_main()?)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        Ok(self.create_branch(name)?)
    }

    fn stage(&self, file: &str) -> Result<()> {
        Ok(self.stage(file)?)
    }

    fn commit(&self, message_file: &Path) -> Result<()> {
        Ok(self.commit(message_file)?)
    }

    fn push(&self, branch: &str) -> Result<()> {
        Ok(self.push(branch)?)
    }

    fn open_pull_request(&self, file: &str, branch: &str, message_file: &Path) -> Result<()> {
        Ok(self.open_pull_request(file, branch, message_file)?)
    }
}

/// External canonicalizer for the nested-table format.
pub trait DocumentFormatter {
    fn format_document(&self, raw: &str) -> Result<String>;
}

/// `toml-sort` subprocess formatter.
#[derive(Debug, Default)]
pub struct TomlSort;

impl DocumentFormatter for TomlSort {
    fn format_document(&self, raw: &str) -> Result<String> {
        Ok(fleet_git::format_document(raw)?)
    }
}

/// Interactive operator surface.
pub trait Operator {
    /// Ask a yes/no question.
    fn confirm(&self, question: &str) -> Result<bool>;
    /// Launch an editor session seeded with `seed`. `None` when the content
    /// came back unchanged or empty after trimming.
    fn edit_text(&self, seed: &str) -> Result<Option<String>>;
    /// Block until the operator acknowledges.
    fn pause(&self, prompt: &str) -> Result<()>;
    /// Render a unified diff.
    fn show_diff(&self, diff: &str);
    /// Surface a warning tied to a repository.
    fn warn(&self, repo: &str, message: &str);
}
