use thiserror::Error;

use crate::storage::errors::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    TooLarge(String),
    #[error("storage error: {0}")]
    Store(StoreError),
    #[error("io error: {0}")]
    Io(String),
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::NotFound(format!("record {id} not found")),
            StoreError::Duplicate(key) => Self::Conflict(format!("duplicate key {key}")),
            other => Self::Store(other),
        }
    }
}
