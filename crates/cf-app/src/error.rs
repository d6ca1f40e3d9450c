//! Error types for the cf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives front ends one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Fill parameters are not valid: {0}")]
    Validation(String),

    #[error("Fill error: {0}")]
    Fill(String),

    #[error("Log error: {0}")]
    Log(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No fill in progress")]
    NotFilling,

    #[error("Debug features are disabled (set CYLFILL_DEBUG_FEATURES=true)")]
    DebugFeaturesDisabled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cf-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<cf_fill::FillError> for AppError {
    fn from(err: cf_fill::FillError) -> Self {
        match err {
            cf_fill::FillError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Fill(other.to_string()),
        }
    }
}

impl From<cf_log::LogError> for AppError {
    fn from(err: cf_log::LogError) -> Self {
        AppError::Log(err.to_string())
    }
}

impl From<cf_storage::StorageError> for AppError {
    fn from(err: cf_storage::StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<cf_core::CoreError> for AppError {
    fn from(err: cf_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
