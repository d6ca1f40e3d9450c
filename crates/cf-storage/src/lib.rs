//! cf-storage: durable key-value persistence for the cylfill stores.
//!
//! Each store serializes its full state as one JSON document under a
//! versioned key. Backends only need `get` and `set`.

pub mod file;
pub mod kv;
pub mod memory;
pub mod overlay;

pub use file::FileStore;
pub use kv::{KeyValueStore, storage_key};
pub use memory::MemoryStore;
pub use overlay::{overlay_json, restore_overlay};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {key}")]
    InvalidKey { key: String },

    #[error("Stored value for {key} is not a JSON object")]
    NotAnObject { key: String },

    #[error("Storage backend lock poisoned")]
    Poisoned,
}
