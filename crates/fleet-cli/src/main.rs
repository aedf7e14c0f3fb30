//! Fleet Sync CLI
//!
//! Walks the catalog of tracked files across the fleet, shows drift as a
//! colored unified diff, and opens pull requests for approved updates.

mod cli;
mod console;
mod error;
mod scratch;

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use fleet_core::catalog::Catalog;
use fleet_core::coordinator::{Coordinator, RunOptions};
use fleet_core::host::{Operator, RepoHost, TomlSort};
use fleet_core::session::RunSession;
use fleet_core::templates::TemplateStore;
use fleet_git::RepoClient;

use cli::Cli;
use console::Console;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_ansi || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli)?;

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    let scratch_root = scratch::reuse_or_new(cli.new_scratch)?;
    tracing::info!(root = %scratch_root.display(), "Using scratch root");

    let session = RunSession::new(cli.dry_run);
    println!("The current session ID is {}.", session.id());

    let console = Console::new();
    let proceed = console.confirm(
        "Note: you must be logged in with `gh auth login`, and origin/main \
         branches will be force updated. Continue?",
    )?;
    if !proceed {
        println!("Exiting...");
        return Ok(());
    }

    let hosts: Vec<Box<dyn RepoHost>> = catalog
        .repos
        .iter()
        .map(|spec| {
            Box::new(RepoClient::new(
                spec.name.as_str(),
                spec.origin_for(&cli.origin_org),
                spec.upstream.as_str(),
                &scratch_root,
            )) as Box<dyn RepoHost>
        })
        .collect();

    let templates = TemplateStore::new(&cli.templates);
    let formatter = TomlSort;
    let coordinator = Coordinator::new(
        &catalog,
        &templates,
        &session,
        &console,
        &formatter,
        RunOptions {
            check_forks: cli.check_forks,
        },
    );

    match coordinator.run(&hosts) {
        Ok(()) => Ok(()),
        Err(fleet_core::Error::Interrupted) => {
            eprintln!(
                "{}",
                "Dirty exit. Some operations may not have completed."
                    .yellow()
                    .bold()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .append(cli.log_append)
                .truncate(!cli.log_append)
                .open(path)?;
            builder.with_writer(Arc::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
