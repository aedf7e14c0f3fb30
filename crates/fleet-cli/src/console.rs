//! Terminal operator: prompts, editor sessions, colored diff rendering
//!
//! Uses dialoguer for yes/no prompts and `$EDITOR` for commit message
//! authoring. Operator interrupts surface as interrupted prompt I/O and are
//! mapped to the run-fatal `Interrupted` error.

use std::env;
use std::fs;
use std::io::Write as _;
use std::process::Command;

use colored::Colorize;
use dialoguer::Confirm;

use fleet_core::host::Operator;
use fleet_core::{Error, Result};

/// Operator implementation backed by the controlling terminal.
pub struct Console {
    editor: String,
}

impl Console {
    pub fn new() -> Self {
        Self {
            editor: env::var("EDITOR").unwrap_or_else(|_| "vi".to_string()),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> Error {
    match e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            Error::Interrupted
        }
        dialoguer::Error::IO(io) => Error::Io(io),
    }
}

impl Operator for Console {
    fn confirm(&self, question: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn edit_text(&self, seed: &str) -> Result<Option<String>> {
        let file = tempfile::Builder::new()
            .prefix("fleet-edit-")
            .suffix(".txt")
            .tempfile()?;
        fs::write(file.path(), seed)?;

        let status = Command::new(&self.editor).arg(file.path()).status()?;
        if !status.success() {
            return Ok(None);
        }

        let edited = fs::read_to_string(file.path())?;
        if edited == seed || edited.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(edited.trim().to_string()))
    }

    fn pause(&self, prompt: &str) -> Result<()> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(())
    }

    fn show_diff(&self, diff: &str) {
        for line in diff.lines() {
            let rendered = if line.starts_with("---") {
                line.bright_magenta()
            } else if line.starts_with("+++") {
                line.bright_cyan()
            } else if line.starts_with("@@") {
                line.bright_yellow()
            } else if line.starts_with('-') {
                line.bright_red()
            } else if line.starts_with('+') {
                line.bright_green()
            } else {
                line.dimmed()
            };
            println!("{rendered}");
        }
    }

    fn warn(&self, repo: &str, message: &str) {
        let prefix = format!("[{repo}]");
        eprintln!("{} {}", prefix.yellow().bold(), message);
        tracing::warn!(repo, message);
    }
}
