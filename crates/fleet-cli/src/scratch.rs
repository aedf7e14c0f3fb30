//! Scratch-root cache: one working root reused across runs
//!
//! Cloning the whole fleet is slow, so the scratch root holding the working
//! copies is remembered in a pointer file under the user cache directory and
//! reused until the operator asks for a fresh one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

const POINTER_FILE: &str = "scratch_root.txt";

fn tracker_path() -> Result<PathBuf> {
    let cache = dirs::cache_dir()
        .ok_or_else(|| CliError::user("No user cache directory available"))?;
    Ok(cache.join("fleet-sync").join(POINTER_FILE))
}

/// Reuse the cached scratch root, or create and remember a fresh one.
pub fn reuse_or_new(new_scratch: bool) -> Result<PathBuf> {
    reuse_or_new_at(&tracker_path()?, new_scratch)
}

fn reuse_or_new_at(tracker: &Path, new_scratch: bool) -> Result<PathBuf> {
    if !new_scratch
        && let Ok(previous) = fs::read_to_string(tracker)
    {
        let previous = PathBuf::from(previous.trim());
        if previous.exists() {
            return Ok(previous);
        }
    }

    let fresh = tempfile::Builder::new()
        .prefix("fleet-sync-")
        .tempdir()?
        .into_path();

    if let Some(parent) = tracker.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(tracker, fresh.to_string_lossy().as_bytes())?;
    Ok(fresh)
}
