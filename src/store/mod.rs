//! Player store: the persisted collection of player records.
//!
//! The service keeps the roster in memory and writes every committed change through a
//! `PlayerStore`. `save` is an upsert of whole records keyed by id.

mod backup;
mod json_file;
mod memory;

pub use backup::write_backup;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::Player;
use std::fmt;

/// Errors from reading or writing player records.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    /// A lock was poisoned by a panic in another thread.
    LockPoisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Serde(e) => write!(f, "Invalid player data: {}", e),
            StoreError::LockPoisoned => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serde(e) => Some(e),
            StoreError::LockPoisoned => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e)
    }
}

/// Backing collection of player records.
pub trait PlayerStore: Send + Sync {
    /// Every stored record.
    fn load(&self) -> Result<Vec<Player>, StoreError>;

    /// Insert or replace `players` in one write. Either all of them land or none do.
    fn save(&self, players: &[Player]) -> Result<(), StoreError>;
}
