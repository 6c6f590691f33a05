//! Error types for Consentry.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Backing storage failed to read, write, or delete. Surfaced to the
    /// caller; a failed write never looks like a successful one.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Persisted consent data that cannot be decoded or fails validation.
    /// Recovered locally by treating the record as absent.
    #[error("Malformed consent record: {0}")]
    MalformedRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
