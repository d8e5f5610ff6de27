//! Storage error types.
//!
//! Every variant names the collection involved and carries the backend's own
//! message in `reason`, so callers can surface it verbatim.

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to connect to or initialize the backend.
    #[error("failed to open storage at '{target}': {reason}")]
    Open { target: String, reason: String },

    /// Failed to read from a collection.
    #[error("failed to read {table}: {reason}")]
    Read { table: &'static str, reason: String },

    /// Failed to write to a collection.
    #[error("failed to write {table}: {reason}")]
    Write { table: &'static str, reason: String },

    /// A uniqueness constraint was violated (e.g. duplicate page slug).
    #[error("conflict in {table}: {reason}")]
    Conflict { table: &'static str, reason: String },

    /// A record referenced a parent that does not exist.
    #[error("missing reference in {table}: {reason}")]
    MissingReference { table: &'static str, reason: String },
}
