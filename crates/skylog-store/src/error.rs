//! Error types for skylog-store.

use std::path::PathBuf;

/// Result type for skylog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skylog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stored image could not be loaded. Fatal: the store is unusable.
    #[error("Failed to initialize database: {0}")]
    Initialization(String),

    /// A write violated a constraint and was aborted without a partial write.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading or writing the durable snapshot failed.
    #[error("Snapshot error at {location}: {source}")]
    Snapshot {
        location: String,
        source: std::io::Error,
    },

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Save was requested before anything was fetched.
    #[error("No weather data to save. Fetch weather data first.")]
    NothingToSave,

    /// Export was requested while the store holds no records.
    #[error("No data to export")]
    NothingToExport,

    /// An edit was committed without a record under edit.
    #[error("No record selected for editing")]
    NotEditing,

    /// The record under edit no longer exists.
    #[error("Record not found: {0}")]
    RecordNotFound(i64),
}

impl Error {
    /// Whether the store must be reopened before it can be used again.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Initialization(_))
    }

    /// Map SQLite constraint failures to [`Error::Constraint`].
    pub(crate) fn from_write(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, ref message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Constraint(message.clone().unwrap_or_else(|| code.to_string()))
            }
            other => Error::Database(other),
        }
    }
}

impl From<skylog_types::ParseError> for Error {
    fn from(err: skylog_types::ParseError) -> Self {
        Error::Constraint(err.to_string())
    }
}
