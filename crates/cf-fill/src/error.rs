//! Error types for fill session operations.

use thiserror::Error;

use crate::params::ValidationError;

/// Result type for fill session operations.
pub type FillResult<T> = Result<T, FillError>;

#[derive(Debug, Error)]
pub enum FillError {
    /// Parameters are incomplete or inconsistent.
    #[error("Fill parameters are not valid: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] cf_storage::StorageError),

    #[error(transparent)]
    Core(#[from] cf_core::CoreError),
}
