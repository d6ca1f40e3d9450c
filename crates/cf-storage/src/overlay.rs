//! Field-by-field restore of stored state onto live state.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{StorageError, StorageResult};

/// Copy every field of `stored` that also exists in `current`.
///
/// Fields only present in `stored` (left over from another schema) are
/// ignored. Returns the number of fields copied.
pub fn overlay_json(current: &mut Value, stored: &Value, key: &str) -> StorageResult<usize> {
    let (Some(current), Some(stored)) = (current.as_object_mut(), stored.as_object()) else {
        return Err(StorageError::NotAnObject {
            key: key.to_string(),
        });
    };

    let mut copied = 0;
    for (field, value) in stored {
        if let Some(slot) = current.get_mut(field) {
            *slot = value.clone();
            copied += 1;
        }
    }
    Ok(copied)
}

/// Parse `raw`, overlay it onto `current` and deserialize the result.
///
/// `current` is left untouched on any error.
pub fn restore_overlay<T>(current: &T, raw: &str, key: &str) -> StorageResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let stored: Value = serde_json::from_str(raw)?;
    let mut merged = serde_json::to_value(current)?;
    overlay_json(&mut merged, &stored, key)?;
    Ok(serde_json::from_value(merged)?)
}
