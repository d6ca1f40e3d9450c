//! Log store: append-only history of completed fills.

use std::collections::HashSet;
use std::sync::Arc;

use cf_core::{EntryId, ReportZone, UnixSeconds};
use cf_storage::{KeyValueStore, restore_overlay, storage_key};
use tracing::{debug, info, warn};

use crate::export::render_export;
use crate::stats::compute_stats;
use crate::types::{LogEntry, LogEntryEnhanced, LogStats, LogStoreState, NewLogEntry};
use crate::{LogError, LogResult};

pub const LOG_STORAGE_NAME: &str = "cylfill-log";
pub const LOG_STORAGE_VERSION: u32 = 1;

pub struct LogStore {
    state: LogStoreState,
    storage: Arc<dyn KeyValueStore>,
    zone: ReportZone,
    key: String,
}

impl LogStore {
    /// `zone` decides calendar days for statistics and the export's
    /// timestamps.
    pub fn new(storage: Arc<dyn KeyValueStore>, zone: ReportZone) -> Self {
        Self {
            state: LogStoreState::default(),
            storage,
            zone,
            key: storage_key(LOG_STORAGE_NAME, LOG_STORAGE_VERSION),
        }
    }

    /// Read-only view of the stored entries, oldest first.
    pub fn state(&self) -> &LogStoreState {
        &self.state
    }

    pub fn zone(&self) -> &ReportZone {
        &self.zone
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Forget every entry. Storage is not touched.
    pub fn reset_store(&mut self) {
        self.state = LogStoreState::default();
    }

    pub fn add_log_entry(&mut self, entry: NewLogEntry) -> LogResult<LogEntry> {
        let values = [
            ("cylinderSize", entry.cylinder_size),
            ("startingPressure", entry.starting_pressure),
            ("targetPressure", entry.target_pressure),
            ("startTime", entry.start_time),
            ("endTime", entry.end_time),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LogError::InvalidEntry {
                what: format!("{} = {}", name, value),
            });
        }

        let mut id = EntryId::generate();
        while self.contains(&id) {
            id = EntryId::generate();
        }
        let stored = LogEntry::from_new(id, entry);

        let mut next = self.state.clone();
        next.log_entries.push(stored);
        self.persist(&next)?;
        self.state = next;

        info!(id = %stored.id, count = self.state.log_entries.len(), "fill logged");
        Ok(stored)
    }

    /// Remove the entry with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete_log_entry(&mut self, id: &EntryId) -> LogResult<bool> {
        let mut next = self.state.clone();
        next.log_entries.retain(|e| &e.id != id);
        let removed = next.log_entries.len() != self.state.log_entries.len();
        self.persist(&next)?;
        self.state = next;

        if removed {
            info!(id = %id, "log entry deleted");
        } else {
            debug!(id = %id, "no log entry to delete");
        }
        Ok(removed)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.state.log_entries.iter().any(|e| &e.id == id)
    }

    pub fn number_of_log_entries(&self) -> usize {
        self.state.log_entries.len()
    }

    pub fn has_logs(&self) -> bool {
        !self.state.log_entries.is_empty()
    }

    /// Entries with derived values, most recent first.
    pub fn get_logs(&self) -> Vec<LogEntryEnhanced> {
        self.state
            .log_entries
            .iter()
            .rev()
            .map(LogEntry::enhance)
            .collect()
    }

    pub fn get_log_stats(&self, reference: UnixSeconds) -> LogResult<LogStats> {
        Ok(compute_stats(&self.get_logs(), reference, &self.zone)?)
    }

    pub fn get_export_text(&self) -> LogResult<String> {
        Ok(render_export(&self.get_logs(), &self.zone)?)
    }

    pub fn write_to_storage(&self) -> LogResult<()> {
        self.persist(&self.state)
    }

    /// Overlay the stored log onto the current one.
    ///
    /// Returns `false` when nothing was stored or the stored document was
    /// unreadable (logged, current entries kept). Entries repeating an
    /// earlier id are dropped.
    pub fn load_from_storage(&mut self) -> LogResult<bool> {
        let Some(raw) = self.storage.get(&self.key)? else {
            debug!(key = %self.key, "no stored fill log");
            return Ok(false);
        };
        match restore_overlay(&self.state, &raw, &self.key) {
            Ok(mut restored) => {
                let mut seen = HashSet::new();
                let before = restored.log_entries.len();
                restored.log_entries.retain(|e| seen.insert(e.id));
                let dropped = before - restored.log_entries.len();
                if dropped > 0 {
                    warn!(key = %self.key, dropped, "dropped stored log entries with duplicate ids");
                }
                self.state = restored;
                debug!(key = %self.key, count = self.state.log_entries.len(), "restored fill log");
                Ok(true)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "ignoring unreadable fill log");
                Ok(false)
            }
        }
    }

    fn persist(&self, state: &LogStoreState) -> LogResult<()> {
        let json = serde_json::to_string(state).map_err(cf_storage::StorageError::from)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }
}
