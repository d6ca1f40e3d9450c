//! cf-log: history of completed fills.
//!
//! Stores finished fills, derives realized fill rates, aggregates them per
//! calendar day and renders the CSV export.

pub mod export;
pub mod random;
pub mod stats;
pub mod store;
pub mod types;

pub use export::{EXPORT_HEADER, render_export, to_fixed};
pub use random::{choose, generate_fake_log_entry, number_in_range};
pub use stats::compute_stats;
pub use store::{LOG_STORAGE_NAME, LOG_STORAGE_VERSION, LogStore};
pub use types::*;

pub type LogResult<T> = Result<T, LogError>;

#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("Storage error: {0}")]
    Storage(#[from] cf_storage::StorageError),

    #[error(transparent)]
    Core(#[from] cf_core::CoreError),

    #[error("Fill error: {0}")]
    Fill(#[from] cf_fill::FillError),

    #[error("Invalid log entry: {what}")]
    InvalidEntry { what: String },
}
