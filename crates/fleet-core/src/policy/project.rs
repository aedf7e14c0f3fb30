//! Nested-table reconciliation policy for the project metadata file
//!
//! A fixed, explicit sequence of per-key-path merges. Repository-owned
//! facts (versioning, coverage targets, tool carve-outs) flow into the
//! template document; everything else stays canonical. The assembled
//! document is canonicalized by the external formatter before comparison.

use toml_edit::{DocumentMut, Item};

use fleet_content::table;

use crate::error::Result;
use crate::host::DocumentFormatter;
use crate::outcome::Outcome;

/// Merge the template's project metadata with the repository's.
///
/// Returns `None` when the repository has no project file: there is nothing
/// to merge against, so the unit is skipped with a warning at the call site.
pub fn reconcile(
    template: &str,
    current: Option<&str>,
    formatter: &dyn DocumentFormatter,
) -> Result<Option<Outcome>> {
    let Some(current) = current else {
        return Ok(None);
    };

    let mut base = table::load(template)?;
    let repo = table::load(current)?;
    let mut warnings = Vec::new();

    merge(&mut base, &repo, &mut warnings)?;

    let desired = formatter.format_document(&table::dump(&base))?;
    Ok(Some(Outcome::classify(current, desired, warnings)))
}

fn merge(base: &mut DocumentMut, repo: &DocumentMut, warnings: &mut Vec<String>) -> Result<()> {
    // project: union of the two tables, repository values win on conflict.
    let repo_project = table::require_table(repo, "project")?.clone();
    let base_project = table::table_at(base, "project")?;
    for (key, value) in repo_project.iter() {
        base_project[key] = value.clone();
    }

    // tool.black: same union, only where the repository carries the table.
    if let Ok(repo_black) = table::require_table(repo, "tool.black") {
        let repo_black = repo_black.clone();
        let base_black = table::table_at(base, "tool.black")?;
        for (key, value) in repo_black.iter() {
            base_black[key] = value.clone();
        }
    }

    // tool.coverage: the threshold and measured packages are repository facts.
    let fail_under = table::item_at(repo, "tool.coverage.report", "fail_under")?;
    table::table_at(base, "tool.coverage.report")?.insert("fail_under", fail_under);
    let source_pkgs = table::item_at(repo, "tool.coverage.run", "source_pkgs")?;
    table::table_at(base, "tool.coverage.run")?.insert("source_pkgs", source_pkgs);

    // tool.mypy: per-repository carve-outs.
    let repo_mypy = table::require_table(repo, "tool.mypy")?;
    for key in ["exclude", "overrides"] {
        if let Some(item) = repo_mypy.get(key) {
            let item = item.clone();
            table::table_at(base, "tool.mypy")?.insert(key, item);
        }
    }

    // tool.pylint.master.ignore: repository's list, sorted after merge.
    let repo_master = table::require_table(repo, "tool.pylint.master")?;
    if let Some(ignore) = repo_master.get("ignore") {
        let ignore = ignore.clone();
        let base_master = table::table_at(base, "tool.pylint.master")?;
        base_master.insert("ignore", ignore);
        if let Some(array) = base_master.get_mut("ignore").and_then(Item::as_array_mut) {
            table::sort_string_array(array);
        }
    }

    // tool.pytest.ini_options: markers and norecursedirs are repository
    // carve-outs; addopts is adopted after a consistency check.
    let repo_ini = table::require_table(repo, "tool.pytest.ini_options")?;
    for key in ["markers", "norecursedirs"] {
        if let Some(item) = repo_ini.get(key) {
            let item = item.clone();
            table::table_at(base, "tool.pytest.ini_options")?.insert(key, item);
        }
    }
    let repo_addopts = table::item_at(repo, "tool.pytest.ini_options", "addopts")?;
    let base_addopts = table::item_at(base, "tool.pytest.ini_options", "addopts")?;
    if let (Some(repo_opts), Some(base_opts)) = (repo_addopts.as_str(), base_addopts.as_str())
        && !repo_opts.starts_with(base_opts)
    {
        warnings.push("Check tool.pytest.ini_options.addopts manually".to_string());
    }
    table::table_at(base, "tool.pytest.ini_options")?.insert("addopts", repo_addopts);

    // tool.ruff: excluded paths stay with the repository; per-file-ignores
    // gain repository-only keys.
    let repo_ruff = table::require_table(repo, "tool.ruff")?;
    if let Some(exclude) = repo_ruff.get("exclude") {
        let exclude = exclude.clone();
        table::table_at(base, "tool.ruff")?.insert("exclude", exclude);
    }
    let repo_ignores = table::require_table(repo, "tool.ruff.lint.per-file-ignores")?.clone();
    let base_ignores = table::table_at(base, "tool.ruff.lint.per-file-ignores")?;
    for (key, value) in repo_ignores.iter() {
        if !base_ignores.contains_key(key) {
            base_ignores.insert(key, value.clone());
        }
    }

    // Packaging dynamic fields and version write-out are repository facts.
    let dynamic = table::item_at(repo, "tool.setuptools", "dynamic")?;
    table::table_at(base, "tool.setuptools")?.insert("dynamic", dynamic);
    let write_to = table::item_at(repo, "tool.setuptools_scm", "write_to")?;
    table::table_at(base, "tool.setuptools_scm")?.insert("write_to", write_to);

    Ok(())
}
