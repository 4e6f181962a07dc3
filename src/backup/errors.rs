use thiserror::Error;

use crate::domain::Collection;

/// Failure to turn untrusted text into a typed backup.
#[derive(Debug, Error)]
pub enum ParseBackupError {
    #[error("invalid backup format: {0}")]
    InvalidFormat(String),
    #[error("invalid backup schema: {}", .0.join("; "))]
    InvalidSchema(Vec<String>),
    #[error("Unsupported backup version: {0}. Please update the application.")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Error)]
pub enum RemapError {
    #[error(
        "referential integrity error: {} '{record_id}' field `{field}` references unknown id '{target}'",
        .collection.table()
    )]
    DanglingReference {
        collection: Collection,
        record_id: String,
        field: &'static str,
        target: String,
    },
    #[error("identifier generator kept returning ids already in use (last: '{candidate}')")]
    IdCollision { candidate: String },
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Parse(#[from] ParseBackupError),
    #[error(transparent)]
    Remap(#[from] RemapError),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("project '{0}' not found")]
    NotFound(String),
}
