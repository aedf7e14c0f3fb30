//! Format adapters and drift classification for Fleet Sync
//!
//! Each tracked-file format pairs a `load` with a `dump`. Equality between
//! two documents is always decided on dumped text, never on parsed
//! structure, so a stable dump is part of every adapter's contract.

pub mod diff;
pub mod error;
pub mod hooklist;
pub mod plain;
pub mod table;
pub mod wordlist;

pub use diff::Drift;
pub use error::{Error, Result};
