// ⚠️ Error kinds for the stats engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// Rejected input, e.g. an athlete name that is empty after trimming
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lap time that does not match HH:MM:SS
    #[error("Unrecognized time format: '{0}'")]
    ParseFailure(String),

    /// Snapshot file that could not be read or parsed
    #[error("Failed to load {path:?}: {reason}")]
    LoadFailure { path: PathBuf, reason: String },

    /// Unknown event or athlete key
    #[error("{0}")]
    NotFound(String),
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::NotFound(_))
    }
}
