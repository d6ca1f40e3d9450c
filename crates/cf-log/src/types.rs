//! Log record types.

use cf_core::{EntryId, UnixSeconds};
use serde::{Deserialize, Serialize};

/// A completed fill as submitted for logging (no id yet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogEntry {
    pub cylinder_size: f64,
    pub starting_pressure: f64,
    pub target_pressure: f64,
    pub start_time: UnixSeconds,
    pub end_time: UnixSeconds,
}

/// A stored fill. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: EntryId,
    pub cylinder_size: f64,
    pub starting_pressure: f64,
    pub target_pressure: f64,
    pub start_time: UnixSeconds,
    pub end_time: UnixSeconds,
}

impl LogEntry {
    pub fn from_new(id: EntryId, entry: NewLogEntry) -> Self {
        Self {
            id,
            cylinder_size: entry.cylinder_size,
            starting_pressure: entry.starting_pressure,
            target_pressure: entry.target_pressure,
            start_time: entry.start_time,
            end_time: entry.end_time,
        }
    }

    /// Seconds between start and end.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Litres of free gas the fill added.
    pub fn litres_filled(&self) -> f64 {
        self.cylinder_size * (self.target_pressure - self.starting_pressure)
    }

    /// Realized L/min. Not finite for a zero-length fill.
    pub fn fill_rate(&self) -> f64 {
        self.litres_filled() / (self.duration() / 60.0)
    }

    pub fn enhance(&self) -> LogEntryEnhanced {
        LogEntryEnhanced {
            entry: *self,
            duration: self.duration(),
            fill_rate: self.fill_rate(),
        }
    }
}

/// A log entry plus values derived from it on every read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryEnhanced {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub duration: f64,
    pub fill_rate: f64,
}

impl std::ops::Deref for LogEntryEnhanced {
    type Target = LogEntry;

    fn deref(&self) -> &LogEntry {
        &self.entry
    }
}

/// Aggregate view over the whole log.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub log_count: usize,
    /// Mean realized rate of fills started on the reference day.
    pub fill_rate_today: Option<f64>,
    /// Mean realized rate over every fill.
    pub fill_rate_all: Option<f64>,
}

/// Persisted shape of the log store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStoreState {
    /// Insertion order, oldest first.
    #[serde(default)]
    pub log_entries: Vec<LogEntry>,
}
