//! Shared application service layer for cylfill.
//!
//! Ties the fill session and the fill log together over one backing store
//! and gives front ends a single place for configuration, finishing fills,
//! and live progress.

pub mod config;
pub mod error;
pub mod fill_service;
pub mod progress;

// Re-export key types for convenience
pub use config::{CONFIG_FILE_NAME, Config};
pub use error::{AppError, AppResult};
pub use fill_service::FillService;
pub use progress::{FillProgress, FillStage};
