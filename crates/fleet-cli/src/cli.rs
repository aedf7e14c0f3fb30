//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Fleet Sync - keep shared configuration files aligned across a fleet of
/// repositories via reviewed pull requests
#[derive(Parser, Debug)]
#[command(name = "fleet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show drift without prompting or publishing changes
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Append to the log file instead of truncating it
    #[arg(long, requires = "log_file")]
    pub log_append: bool,

    /// Discard the cached scratch root and start from a fresh one
    #[arg(long)]
    pub new_scratch: bool,

    /// GitHub organization or account holding the fleet forks
    #[arg(long, env = "FLEET_ORIGIN_ORG")]
    pub origin_org: String,

    /// Re-create missing forks before cloning
    #[arg(long)]
    pub check_forks: bool,

    /// Disable colors and hyperlinks in terminal output
    #[arg(long)]
    pub no_ansi: bool,

    /// Directory holding the canonical templates
    #[arg(long, default_value = "templates")]
    pub templates: PathBuf,

    /// Catalog file overriding the built-in fleet
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
