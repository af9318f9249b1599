//! Storage-specific error types for the in-memory store.
//!
//! These errors are internal to the storage layer and are converted to
//! `finboard_core::Error` before being returned to callers.

use finboard_core::errors::Error;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} {id} already exists")]
    UniqueViolation { entity: &'static str, id: String },

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StorageError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => Error::NotFound(err.to_string()),
            StorageError::UniqueViolation { .. } | StorageError::ForeignKeyViolation(_) => {
                Error::ConstraintViolation(err.to_string())
            }
        }
    }
}

/// Extension trait for converting storage Results to core Results.
pub trait IntoCore<T> {
    fn into_core(self) -> finboard_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> finboard_core::Result<T> {
        self.map_err(Error::from)
    }
}
