//! External document canonicalizer
//!
//! The nested-table format has an ecosystem formatter (`toml-sort`). The
//! reconciled document is piped through it via a temporary file so diffs are
//! computed against the exact bytes the fleet's own tooling would produce.

use std::fs;
use std::process::Command;

use crate::error::Result;
use crate::process::run;

/// Canonicalize a nested-table document with `toml-sort`.
///
/// A non-zero exit from the formatter is a hard error for the caller's unit
/// of work.
pub fn format_document(raw: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("fleet-fmt-")
        .suffix(".toml")
        .tempfile()?;
    fs::write(file.path(), raw)?;

    let mut command = Command::new("toml-sort");
    command.arg("--in-place").arg(file.path());
    run(command)?;

    Ok(fs::read_to_string(file.path())?)
}
