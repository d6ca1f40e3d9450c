use std::sync::Arc;

use crate::StorageResult;

/// Minimal durable string store.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// Versioned storage key, e.g. `cylfill-log-1`.
///
/// Bumping the version orphans data stored under the old key.
pub fn storage_key(name: &str, version: u32) -> String {
    format!("{}-{}", name, version)
}
