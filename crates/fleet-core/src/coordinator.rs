//! Run coordinator: iterates tracked-file categories across the fleet
//!
//! Category order is fixed: full-replacement files, sorted-set files, the
//! hook-list file, the nested-table file. Within a category repositories are
//! visited in catalog order, and one unit of work completes fully before the
//! next begins.

use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, FullFile};
use crate::error::{Error, Result};
use crate::host::{DocumentFormatter, Operator, RepoHost};
use crate::outcome::Outcome;
use crate::policy;
use crate::session::RunSession;
use crate::templates::TemplateStore;
use crate::workflow::{self, MessageCache, UnitOfWork, WorkStatus};

/// Options fixed at process start.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Re-create missing forks before cloning.
    pub check_forks: bool,
}

/// Drives one full run across the catalog.
pub struct Coordinator<'a> {
    catalog: &'a Catalog,
    templates: &'a TemplateStore,
    session: &'a RunSession,
    operator: &'a dyn Operator,
    formatter: &'a dyn DocumentFormatter,
    options: RunOptions,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        templates: &'a TemplateStore,
        session: &'a RunSession,
        operator: &'a dyn Operator,
        formatter: &'a dyn DocumentFormatter,
        options: RunOptions,
    ) -> Self {
        Self {
            catalog,
            templates,
            session,
            operator,
            formatter,
            options,
        }
    }

    /// Prepare every repository: optional fork check, clone, sync main.
    pub fn prepare(&self, hosts: &[Box<dyn RepoHost>]) -> Result<()> {
        for host in hosts {
            if self.options.check_forks {
                // A throwaway upstream clone just to ensure the fork exists.
                let _ = fs::remove_dir_all(host.work_dir());
                host.clone_upstream()?;
                host.fork()?;
                fs::remove_dir_all(host.work_dir())?;
            }
            host.clone_origin()?;
            host.ensure_main()?;
        }
        Ok(())
    }

    /// Run every category in fixed order, offering an early-exit checkpoint
    /// after each file that produced pull requests.
    pub fn run(&self, hosts: &[Box<dyn RepoHost>]) -> Result<()> {
        self.prepare(hosts)?;

        for file in &self.catalog.full_files {
            if self.run_full_file(file, hosts)? && self.checkpoint()? {
                return Ok(());
            }
        }

        for file in &self.catalog.sorted_files {
            if self.run_sorted_file(file, hosts)? && self.checkpoint()? {
                return Ok(());
            }
        }

        if self.run_hook_file(hosts)? && self.checkpoint()? {
            return Ok(());
        }

        if self.run_project_file(hosts)? && self.checkpoint()? {
            return Ok(());
        }

        Ok(())
    }

    /// One full-replacement file across the fleet.
    fn run_full_file(&self, file: &FullFile, hosts: &[Box<dyn RepoHost>]) -> Result<bool> {
        let deployed = TemplateStore::deployed_name(&file.name).to_string();
        let template = self.templates.load(&file.name)?;
        let mut cache = MessageCache::new();
        let mut published = false;

        for host in hosts {
            if file.skip.iter().any(|name| name == host.name()) {
                self.operator.warn(
                    host.name(),
                    &format!("Configured as skip for {deployed}, check manually"),
                );
                continue;
            }
            tracing::info!(repo = host.name(), file = %deployed, "Checking");

            let current = read_current(host.work_dir(), &deployed)?;
            let outcome = policy::full::reconcile(&template, current.as_deref());
            published |= self.approve(&deployed, &outcome, current.as_deref(), host.as_ref(), &mut cache)?;
        }
        Ok(published)
    }

    /// One sorted-set file across the fleet.
    fn run_sorted_file(&self, file: &str, hosts: &[Box<dyn RepoHost>]) -> Result<bool> {
        let mut cache =
            MessageCache::seeded(format!("Sort, lowercase and remove duplicates in {file}"));
        let mut published = false;

        for host in hosts {
            tracing::info!(repo = host.name(), file, "Checking");
            let current = read_current(host.work_dir(), file)?;
            let Some(outcome) = policy::sorted::reconcile(current.as_deref()) else {
                self.operator
                    .warn(host.name(), &format!("{file} not found"));
                self.operator.pause("Press Enter to continue...")?;
                continue;
            };
            published |= self.approve(file, &outcome, current.as_deref(), host.as_ref(), &mut cache)?;
        }
        Ok(published)
    }

    /// The hook-list file across the fleet.
    fn run_hook_file(&self, hosts: &[Box<dyn RepoHost>]) -> Result<bool> {
        let file = self.catalog.hook_file.as_str();
        let template = self.templates.load(file)?;
        let mut cache = MessageCache::new();
        let mut published = false;

        for host in hosts {
            tracing::info!(repo = host.name(), file, "Checking");
            let exceptions = self.catalog.hook_exceptions_for(host.name());
            let current = read_current(host.work_dir(), file)?;

            let outcome =
                match policy::hooks::reconcile(&template, current.as_deref(), exceptions) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        self.operator
                            .warn(host.name(), &format!("Skipping {file}: {e}"));
                        continue;
                    }
                };
            published |= self.approve(file, &outcome, current.as_deref(), host.as_ref(), &mut cache)?;
        }
        Ok(published)
    }

    /// The nested-table project file across the fleet.
    fn run_project_file(&self, hosts: &[Box<dyn RepoHost>]) -> Result<bool> {
        let file = self.catalog.project_file.as_str();
        self.operator.warn(
            "fleet",
            "The project metadata merge is rough, watch the diffs closely",
        );
        let template = self.templates.load(file)?;
        let mut cache = MessageCache::new();
        let mut published = false;

        for host in hosts {
            tracing::info!(repo = host.name(), file, "Checking");
            let current = read_current(host.work_dir(), file)?;

            let outcome = match policy::project::reconcile(
                &template,
                current.as_deref(),
                self.formatter,
            ) {
                Ok(Some(outcome)) => outcome,
                Ok(None) => {
                    self.operator
                        .warn(host.name(), &format!("{file} not found, check manually"));
                    continue;
                }
                Err(e) => {
                    self.operator
                        .warn(host.name(), &format!("Skipping {file}: {e}"));
                    continue;
                }
            };
            published |= self.approve(file, &outcome, current.as_deref(), host.as_ref(), &mut cache)?;
        }
        Ok(published)
    }

    fn approve(
        &self,
        file: &str,
        outcome: &Outcome,
        current: Option<&str>,
        host: &dyn RepoHost,
        cache: &mut MessageCache,
    ) -> Result<bool> {
        let unit = UnitOfWork {
            file,
            outcome,
            current: current.unwrap_or(""),
        };
        let status = workflow::run_unit(unit, host, self.operator, self.session, cache)?;
        Ok(status == WorkStatus::Published)
    }

    /// Offer the operator an early exit once a file produced pull requests.
    fn checkpoint(&self) -> Result<bool> {
        self.operator
            .confirm("PRs have been made. Do you want to stop before the next file?")
    }
}

/// Read a repository's current copy of a tracked file. Absence is a policy
/// concern, not an error.
fn read_current(work_dir: &Path, file: &str) -> Result<Option<String>> {
    match fs::read_to_string(work_dir.join(file)) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}
