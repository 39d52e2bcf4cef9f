//! Error types for momentum-core.
//!
//! Store mutations are write-through: a failed save is reported here and the
//! in-memory state is left exactly as it was before the call.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the persistence seam and the stores built on it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized.
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backing medium refused the write (quota, read-only, ...).
    #[error("write rejected for key '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    /// No habit matches the given id.
    #[error("habit not found: {0}")]
    NotFound(String),

    /// Habit names must be non-empty.
    #[error("habit name must not be empty")]
    EmptyName,

    /// Habit names are unique, ignoring case.
    #[error("a habit named '{0}' already exists")]
    DuplicateName(String),
}

/// Errors raised by task status transitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {0} is already completed")]
    AlreadyCompleted(String),

    #[error("task {0} is not completed")]
    NotCompleted(String),

    #[error("undo window for task {id} closed at {closed_at}")]
    UndoWindowClosed { id: String, closed_at: DateTime<Utc> },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
