use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a file-backed document store.
///
/// Stores surface these untouched; callers decide how to report them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read {}: {source}", path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed document {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record {0} not found")]
    NotFound(String),
    #[error("duplicate key {0}")]
    Duplicate(String),
}

impl StoreError {
    /// Stable short name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::StorageRead { .. } => "storage_read",
            StoreError::Decode { .. } => "decode",
            StoreError::StorageWrite { .. } => "storage_write",
            StoreError::NotFound(_) => "not_found",
            StoreError::Duplicate(_) => "duplicate",
        }
    }
}
