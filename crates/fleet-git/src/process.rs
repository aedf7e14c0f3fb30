//! Subprocess helper shared by forge and formatter calls

use std::process::Command;

use crate::error::{Error, Result};

/// Run a command to completion, failing on a non-zero exit status.
///
/// Stdout is returned; stderr is folded into the error on failure.
pub(crate) fn run(mut command: Command) -> Result<String> {
    let program = command.get_program().to_string_lossy().to_string();
    tracing::debug!(command = ?command, "Running subprocess");

    let output = command.output()?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            program,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
