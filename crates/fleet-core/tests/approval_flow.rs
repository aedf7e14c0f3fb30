//! End-to-end tests for the approval workflow and run coordinator, driven
//! by recording fakes for the version-control and operator collaborators.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use fleet_core::Result;
use fleet_core::catalog::{Catalog, FullFile};
use fleet_core::coordinator::{Coordinator, RunOptions};
use fleet_core::host::{DocumentFormatter, Operator, RepoHost};
use fleet_core::outcome::Outcome;
use fleet_core::policy;
use fleet_core::session::RunSession;
use fleet_core::templates::TemplateStore;
use fleet_core::workflow::{self, MessageCache, UnitOfWork, WorkStatus};

/// RepoHost fake that records every call in order.
struct RecordingHost {
    name: String,
    work_dir: PathBuf,
    calls: RefCell<Vec<String>>,
    fail_push: bool,
}

impl RecordingHost {
    fn new(name: &str, work_dir: &Path) -> Self {
        Self {
            name: name.to_string(),
            work_dir: work_dir.to_path_buf(),
            calls: RefCell::new(Vec::new()),
            fail_push: false,
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl RepoHost for RecordingHost {
    fn name(&self) -> &str {
        &self.name
    }

    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn clone_origin(&self) -> Result<()> {
        self.record("clone_origin");
        Ok(())
    }

    fn clone_upstream(&self) -> Result<()> {
        self.record("clone_upstream");
        Ok(())
    }

    fn fork(&self) -> Result<()> {
        self.record("fork");
        Ok(())
    }

    fn ensure_main(&self) -> Result<()> {
        self.record("ensure_main");
        Ok(())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.record(format!("create_branch {branch}"));
        Ok(())
    }

    fn stage(&self, file: &str) -> Result<()> {
        self.record(format!("stage {file}"));
        Ok(())
    }

    fn commit(&self, _message_file: &Path) -> Result<()> {
        self.record("commit");
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<()> {
        if self.fail_push {
            self.record(format!("push {branch} (failed)"));
            return Err(fleet_git::Error::CommandFailed {
                program: "git".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "remote rejected".to_string(),
            }
            .into());
        }
        self.record(format!("push {branch}"));
        Ok(())
    }

    fn open_pull_request(&self, file: &str, branch: &str, _message_file: &Path) -> Result<()> {
        self.record(format!("open_pull_request {file} {branch}"));
        Ok(())
    }
}

/// Operator fake with scripted confirmation answers and a fixed editor
/// result.
struct ScriptedOperator {
    confirms: RefCell<Vec<bool>>,
    edited: Option<String>,
    warnings: RefCell<Vec<String>>,
}

impl ScriptedOperator {
    /// Answers are consumed front to back.
    fn new(confirms: &[bool], edited: Option<&str>) -> Self {
        Self {
            confirms: RefCell::new(confirms.to_vec()),
            edited: edited.map(str::to_string),
            warnings: RefCell::new(Vec::new()),
        }
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl Operator for ScriptedOperator {
    fn confirm(&self, _question: &str) -> Result<bool> {
        let mut confirms = self.confirms.borrow_mut();
        assert!(!confirms.is_empty(), "unexpected confirm prompt");
        Ok(confirms.remove(0))
    }

    fn edit_text(&self, _seed: &str) -> Result<Option<String>> {
        Ok(self.edited.clone())
    }

    fn pause(&self, _prompt: &str) -> Result<()> {
        Ok(())
    }

    fn show_diff(&self, _diff: &str) {}

    fn warn(&self, repo: &str, message: &str) {
        self.warnings.borrow_mut().push(format!("[{repo}] {message}"));
    }
}

struct NoFormat;

impl DocumentFormatter for NoFormat {
    fn format_document(&self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }
}

fn unit<'a>(file: &'a str, outcome: &'a Outcome, current: &'a str) -> UnitOfWork<'a> {
    UnitOfWork {
        file,
        outcome,
        current,
    }
}

#[test]
fn test_dry_run_short_circuits_after_showing_drift() {
    let scratch = tempfile::tempdir().unwrap();
    let host = RecordingHost::new("demo", scratch.path());
    let operator = ScriptedOperator::new(&[], None);
    let session = RunSession::with_id("240101-120000", true);
    let mut cache = MessageCache::new();

    let outcome = policy::full::reconcile("new\n", Some("old\n"));
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &host,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Done);
    assert!(host.calls().is_empty());
}

#[test]
fn test_declined_confirmation_has_no_side_effects() {
    let scratch = tempfile::tempdir().unwrap();
    let host = RecordingHost::new("demo", scratch.path());
    let operator = ScriptedOperator::new(&[false], None);
    let session = RunSession::with_id("240101-120000", false);
    let mut cache = MessageCache::new();

    let outcome = policy::full::reconcile("new\n", Some("old\n"));
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &host,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Done);
    assert!(host.calls().is_empty());
}

#[test]
fn test_approved_unit_publishes_exactly_once() {
    let scratch = tempfile::tempdir().unwrap();
    let host = RecordingHost::new("demo", scratch.path());
    let operator = ScriptedOperator::new(&[true], Some("fix"));
    let session = RunSession::with_id("240101-120000", false);
    let mut cache = MessageCache::new();

    let outcome = policy::full::reconcile("new\n", Some("old\n"));
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &host,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Published);
    assert_eq!(
        host.calls(),
        vec![
            "create_branch chore/file_x.txt_240101-120000",
            "stage x.txt",
            "commit",
            "push chore/file_x.txt_240101-120000",
            "open_pull_request x.txt chore/file_x.txt_240101-120000",
            "ensure_main",
        ]
    );
    assert_eq!(
        fs::read_to_string(scratch.path().join("x.txt")).unwrap(),
        "new\n"
    );
}

#[test]
fn test_unchanged_content_is_silent() {
    let scratch = tempfile::tempdir().unwrap();
    let host = RecordingHost::new("demo", scratch.path());
    let operator = ScriptedOperator::new(&[], None);
    let session = RunSession::with_id("240101-120000", false);
    let mut cache = MessageCache::new();

    let outcome = policy::full::reconcile("same\n", Some("same\n"));
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "same\n"),
        &host,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Done);
    assert!(host.calls().is_empty());
    assert!(operator.warnings().is_empty());
}

#[test]
fn test_empty_message_terminates_the_unit() {
    let scratch = tempfile::tempdir().unwrap();
    let host = RecordingHost::new("demo", scratch.path());
    let operator = ScriptedOperator::new(&[true], None);
    let session = RunSession::with_id("240101-120000", false);
    let mut cache = MessageCache::new();

    let outcome = policy::full::reconcile("new\n", Some("old\n"));
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &host,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Done);
    assert!(host.calls().is_empty());
    assert!(
        operator
            .warnings()
            .iter()
            .any(|w| w.contains("No commit message"))
    );
}

#[test]
fn test_publish_failure_ends_the_unit_not_the_run() {
    let scratch = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new("demo", scratch.path());
    host.fail_push = true;
    let operator = ScriptedOperator::new(&[true], Some("fix"));
    let session = RunSession::with_id("240101-120000", false);
    let mut cache = MessageCache::new();

    let outcome = policy::full::reconcile("new\n", Some("old\n"));
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &host,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Done);
    let calls = host.calls();
    assert!(calls.last().unwrap().contains("push"));
    assert!(!calls.iter().any(|c| c.starts_with("open_pull_request")));
    assert!(operator.warnings().iter().any(|w| w.contains("failed")));
}

#[test]
fn test_message_is_reused_across_repositories() {
    let scratch = tempfile::tempdir().unwrap();
    let first = RecordingHost::new("alpha", &scratch.path().join("alpha"));
    let second = RecordingHost::new("beta", &scratch.path().join("beta"));
    fs::create_dir_all(first.work_dir()).unwrap();
    fs::create_dir_all(second.work_dir()).unwrap();

    let session = RunSession::with_id("240101-120000", false);
    let mut cache = MessageCache::new();
    let outcome = policy::full::reconcile("new\n", Some("old\n"));

    // First repository: confirm update, author a message.
    let operator = ScriptedOperator::new(&[true], Some("fix"));
    workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &first,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    // Second repository: confirm update, reuse the message. The editor is
    // never consulted, so the scripted editor result can be None.
    let operator = ScriptedOperator::new(&[true, true], None);
    let status = workflow::run_unit(
        unit("x.txt", &outcome, "old\n"),
        &second,
        &operator,
        &session,
        &mut cache,
    )
    .unwrap();

    assert_eq!(status, WorkStatus::Published);
}

/// Catalog with one full file and minimal templates on disk; the working
/// copy lives under `scratch/demo`.
fn dry_run_fixture(scratch: &Path, skip: &[&str]) -> (Catalog, TemplateStore) {
    let templates_dir = scratch.join("templates");
    fs::create_dir_all(&templates_dir).unwrap();
    fs::write(templates_dir.join("codecov.yml"), "new\n").unwrap();
    fs::write(templates_dir.join(".pre-commit-config.yaml"), "repos: []\n").unwrap();
    fs::write(templates_dir.join("pyproject.toml"), "[project]\nname = \"t\"\n").unwrap();

    let catalog = Catalog {
        repos: Vec::new(),
        full_files: vec![FullFile {
            name: "codecov.yml".to_string(),
            skip: skip.iter().map(|s| s.to_string()).collect(),
        }],
        sorted_files: vec![".config/dictionary.txt".to_string()],
        hook_file: ".pre-commit-config.yaml".to_string(),
        hook_exceptions: Default::default(),
        project_file: "pyproject.toml".to_string(),
    };

    (catalog, TemplateStore::new(&templates_dir))
}

#[test]
fn test_coordinator_skip_list_bypasses_the_workflow() {
    let scratch = tempfile::tempdir().unwrap();
    let (catalog, templates) = dry_run_fixture(scratch.path(), &["demo"]);

    let work = scratch.path().join("demo");
    fs::create_dir_all(work.join(".config")).unwrap();
    fs::write(work.join("codecov.yml"), "old\n").unwrap();
    fs::write(work.join(".config/dictionary.txt"), "a\n").unwrap();

    let session = RunSession::with_id("240101-120000", true);
    let operator = ScriptedOperator::new(&[], None);
    let formatter = NoFormat;
    let coordinator = Coordinator::new(
        &catalog,
        &templates,
        &session,
        &operator,
        &formatter,
        RunOptions::default(),
    );

    let host = RecordingHost::new("demo", &work);
    let hosts: Vec<Box<dyn RepoHost>> = vec![Box::new(host)];

    coordinator.run(&hosts).unwrap();

    // The skipped file never reached the workflow; the missing project file
    // was flagged for manual handling; nothing was published, so no
    // checkpoint prompt fired (the scripted operator would have panicked).
    let warnings = operator.warnings();
    assert!(warnings.iter().any(|w| w.contains("Configured as skip")));
    assert!(warnings.iter().any(|w| w.contains("pyproject.toml not found")));
}

#[test]
fn test_coordinator_dry_run_publishes_nothing() {
    let scratch = tempfile::tempdir().unwrap();
    let (catalog, templates) = dry_run_fixture(scratch.path(), &[]);

    let work = scratch.path().join("demo");
    fs::create_dir_all(work.join(".config")).unwrap();
    fs::write(work.join("codecov.yml"), "old\n").unwrap();
    fs::write(work.join(".config/dictionary.txt"), "B\na\na\n").unwrap();

    let session = RunSession::with_id("240101-120000", true);
    let operator = ScriptedOperator::new(&[], None);
    let formatter = NoFormat;
    let coordinator = Coordinator::new(
        &catalog,
        &templates,
        &session,
        &operator,
        &formatter,
        RunOptions::default(),
    );

    let host = RecordingHost::new("demo", &work);
    let hosts: Vec<Box<dyn RepoHost>> = vec![Box::new(host)];

    coordinator.run(&hosts).unwrap();

    // Drift was reported for both files, but dry-run stopped every unit
    // before any prompt or VCS call beyond preparation.
    let warnings = operator.warnings();
    assert!(warnings.iter().any(|w| w.contains("codecov.yml needs to be updated")));
    assert!(
        warnings
            .iter()
            .any(|w| w.contains(".config/dictionary.txt needs to be updated"))
    );
    assert_eq!(
        fs::read_to_string(work.join("codecov.yml")).unwrap(),
        "old\n"
    );
}
