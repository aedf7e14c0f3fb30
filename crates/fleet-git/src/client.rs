//! Per-repository git and forge operations

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;

use crate::error::Result;
use crate::process::run;

/// Handle for one fleet repository: its working copy under the scratch root
/// and its origin (fork) and upstream forge remotes.
#[derive(Debug, Clone)]
pub struct RepoClient {
    name: String,
    /// Fork slug, e.g. `my-org/molecule`.
    origin: String,
    /// Upstream slug, e.g. `ansible/molecule`.
    upstream: String,
    scratch_root: PathBuf,
    work_dir: PathBuf,
}

impl RepoClient {
    pub fn new(
        name: impl Into<String>,
        origin: impl Into<String>,
        upstream: impl Into<String>,
        scratch_root: &Path,
    ) -> Self {
        let name = name.into();
        let work_dir = scratch_root.join(&name);
        Self {
            name,
            origin: origin.into(),
            upstream: upstream.into(),
            scratch_root: scratch_root.to_path_buf(),
            work_dir,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// The account or organization holding the fork.
    pub fn origin_owner(&self) -> &str {
        self.origin.split('/').next().unwrap_or(&self.origin)
    }

    fn origin_uri(&self) -> String {
        format!("git@github.com:{}.git", self.origin)
    }

    fn upstream_uri(&self) -> String {
        format!("git@github.com:{}.git", self.upstream)
    }

    /// Shallow-clone the fork into the scratch root. A no-op when the
    /// working copy already exists.
    pub fn clone_origin(&self) -> Result<()> {
        if self.work_dir.exists() {
            tracing::info!(repo = %self.name, "Repository already cloned");
            return Ok(());
        }
        tracing::info!(repo = %self.name, "Cloning from origin");
        let uri = self.origin_uri();
        let mut command = Command::new("gh");
        command
            .args(["repo", "clone", uri.as_str(), self.name.as_str(), "--", "--depth=1"])
            .current_dir(&self.scratch_root);
        run(command)?;
        Ok(())
    }

    /// Shallow-clone the upstream repository into the scratch root.
    pub fn clone_upstream(&self) -> Result<()> {
        tracing::info!(repo = %self.name, "Cloning from upstream");
        let uri = self.upstream_uri();
        let mut command = Command::new("gh");
        command
            .args(["repo", "clone", uri.as_str(), self.name.as_str(), "--", "--depth=1"])
            .current_dir(&self.scratch_root);
        run(command)?;
        Ok(())
    }

    /// Ensure a fork of the upstream repository exists.
    pub fn fork(&self) -> Result<()> {
        tracing::info!(repo = %self.name, "Ensuring fork is available");
        let mut command = Command::new("gh");
        command
            .args(["repo", "fork", "--remote=false"])
            .current_dir(&self.work_dir);
        run(command)?;
        Ok(())
    }

    /// Reset the working copy's main branch to upstream and push it to the
    /// fork, so every unit of work starts from the upstream state.
    pub fn ensure_main(&self) -> Result<()> {
        tracing::info!(repo = %self.name, "Syncing main to upstream");
        for args in [
            ["checkout", "main"].as_slice(),
            ["reset", "--hard", "upstream/main"].as_slice(),
            ["pull", "upstream", "main"].as_slice(),
            ["push", "origin", "main"].as_slice(),
        ] {
            let mut command = Command::new("git");
            command.args(args).current_dir(&self.work_dir);
            run(command)?;
        }
        Ok(())
    }

    /// Create a branch at HEAD and check it out.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        tracing::info!(repo = %self.name, branch = %name, "Creating branch");
        let repo = Repository::open(&self.work_dir)?;
        let head = repo.head()?.peel_to_commit()?;
        repo.branch(name, &head, false)?;
        repo.set_head(&format!("refs/heads/{name}"))?;
        repo.checkout_head(None)?;
        Ok(())
    }

    /// Stage one file.
    pub fn stage(&self, file: &str) -> Result<()> {
        tracing::info!(repo = %self.name, file, "Staging changes");
        let repo = Repository::open(&self.work_dir)?;
        let mut index = repo.index()?;
        index.add_path(Path::new(file))?;
        index.write()?;
        Ok(())
    }

    /// Commit the staged changes with the message read from `message_file`.
    pub fn commit(&self, message_file: &Path) -> Result<()> {
        tracing::info!(repo = %self.name, "Committing changes");
        let message = std::fs::read_to_string(message_file)?;
        let repo = Repository::open(&self.work_dir)?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let parent = repo.head()?.peel_to_commit()?;
        let signature = repo.signature()?;
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message.trim(),
            &tree,
            &[&parent],
        )?;
        Ok(())
    }

    /// Push a branch to the fork.
    pub fn push(&self, branch: &str) -> Result<()> {
        tracing::info!(repo = %self.name, branch, "Pushing to origin");
        let mut command = Command::new("git");
        command
            .args(["push", "origin", branch])
            .current_dir(&self.work_dir);
        run(command)?;
        Ok(())
    }

    /// Open a pull request against upstream for one updated file.
    pub fn open_pull_request(&self, file: &str, branch: &str, message_file: &Path) -> Result<()> {
        tracing::info!(repo = %self.name, file, "Creating PR");
        let title = format!("chore: Update {file}");
        let head = format!("{}:{}", self.origin_owner(), branch);
        let mut command = Command::new("gh");
        command
            .args(["pr", "create", "--repo", self.upstream.as_str()])
            .args(["--title", title.as_str()])
            .args(["--base", "main", "--head", head.as_str()])
            .arg("--body-file")
            .arg(message_file)
            .current_dir(&self.work_dir);
        run(command)?;
        tracing::info!(repo = %self.name, "PR created");
        Ok(())
    }
}
