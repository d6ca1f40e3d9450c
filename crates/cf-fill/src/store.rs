//! Fill session store: the idle/active state machine.

use std::sync::Arc;

use cf_core::{Clock, Pressure, ReportZone, Time, UnixSeconds, Volume, bar, in_seconds, s};
use cf_storage::{KeyValueStore, restore_overlay, storage_key};
use tracing::{debug, info, warn};

use crate::error::FillResult;
use crate::math::{calculate_fill_time, guesstimate_litres_filled, guesstimate_pressure};
use crate::params::{FillField, FillParameters, PartialFillParameters};
use crate::session::{FillSessionState, SessionDefaults};

pub const FILL_STORAGE_NAME: &str = "cylfill";
pub const FILL_STORAGE_VERSION: u32 = 1;

/// Owns the current fill session and writes it through to storage on every
/// start/stop.
///
/// Idle until [`FillStore::start_filling`] succeeds, active until
/// [`FillStore::stop_filling`].
pub struct FillStore {
    state: FillSessionState,
    defaults: SessionDefaults,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
}

impl FillStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_defaults(storage, clock, SessionDefaults::default())
    }

    pub fn with_defaults(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        defaults: SessionDefaults,
    ) -> Self {
        Self {
            state: FillSessionState::with_defaults(defaults),
            defaults,
            storage,
            clock,
            key: storage_key(FILL_STORAGE_NAME, FILL_STORAGE_VERSION),
        }
    }

    /// Read-only view of the session.
    pub fn state(&self) -> &FillSessionState {
        &self.state
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Back to a fresh idle session. Storage is not touched.
    pub fn reset_store(&mut self) {
        self.state = FillSessionState::with_defaults(self.defaults);
    }

    pub fn set_fill_parameters(&mut self, params: &PartialFillParameters) {
        self.state.apply(params);
    }

    pub fn clear_fill_parameter(&mut self, field: FillField) {
        self.state.clear(field);
    }

    /// Use a fill rate derived from past fills.
    pub fn set_fill_rate_from_log(&mut self, fill_rate_lpm: f64) {
        self.state.fill_rate = Some(fill_rate_lpm);
        self.state.fill_rate_from_log = true;
    }

    pub fn get_partial_fill_parameters(&self) -> PartialFillParameters {
        self.state.partial_parameters()
    }

    /// The session's parameters, validated.
    ///
    /// Fails when a field is missing or the starting pressure is above the
    /// target. Values must also be finite, the cylinder size and fill rate
    /// positive, and the starting pressure not negative.
    pub fn get_fill_parameters(&self) -> FillResult<FillParameters> {
        Ok(self.state.partial_parameters().validate()?)
    }

    /// Fill duration for the current parameters.
    pub fn get_fill_time(&self) -> FillResult<Time> {
        let params = self.get_fill_parameters()?;
        Ok(calculate_fill_time(&params))
    }

    /// Begin a fill now. Returns the start time.
    ///
    /// Calling this while already filling restarts the fill with the current
    /// parameters. Nothing changes if validation or the write fails.
    pub fn start_filling(&mut self) -> FillResult<UnixSeconds> {
        let params = self.get_fill_parameters()?;
        let start_time = self.clock.now();
        let end_time = start_time + in_seconds(calculate_fill_time(&params));

        let next = FillSessionState {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..self.state.clone()
        };
        self.persist(&next)?;
        self.state = next;

        info!(start_time, end_time, "fill started");
        Ok(start_time)
    }

    /// End the fill. The starting pressure is forgotten since the cylinder
    /// needs re-measuring before the next fill.
    pub fn stop_filling(&mut self) -> FillResult<()> {
        let was_active = self.state.is_active();
        let next = FillSessionState {
            start_time: None,
            end_time: None,
            starting_pressure: None,
            ..self.state.clone()
        };
        self.persist(&next)?;
        self.state = next;

        if was_active {
            info!("fill stopped");
        }
        Ok(())
    }

    pub fn is_filling(&self) -> bool {
        self.state.is_active()
    }

    /// Time left until the projected end, never below zero. `None` when idle.
    pub fn get_fill_time_remaining(&self, now: UnixSeconds) -> Option<Time> {
        self.state.end_time.map(|end| s((end - now).max(0.0)))
    }

    pub fn get_litres_filled(&self, now: UnixSeconds) -> FillResult<Option<Volume>> {
        match self.state.start_time {
            Some(start) => {
                let params = self.get_fill_parameters()?;
                Ok(Some(guesstimate_litres_filled(&params, start, now)))
            }
            None => Ok(None),
        }
    }

    /// Extrapolated pressure while filling, otherwise the last known starting
    /// pressure (if any).
    pub fn get_current_pressure(&self, now: UnixSeconds) -> FillResult<Option<Pressure>> {
        match self.state.start_time {
            Some(start) => {
                let params = self.get_fill_parameters()?;
                Ok(Some(guesstimate_pressure(&params, start, now)))
            }
            None => Ok(self.state.starting_pressure.map(bar)),
        }
    }

    /// Wall-clock start as `HH:MM`.
    pub fn get_start_time_formatted(&self, zone: &ReportZone) -> FillResult<Option<String>> {
        self.state
            .start_time
            .map(|t| zone.format(t, "%H:%M"))
            .transpose()
            .map_err(Into::into)
    }

    /// Projected wall-clock end as `HH:MM`.
    pub fn get_end_time_formatted(&self, zone: &ReportZone) -> FillResult<Option<String>> {
        self.state
            .end_time
            .map(|t| zone.format(t, "%H:%M"))
            .transpose()
            .map_err(Into::into)
    }

    pub fn write_to_storage(&self) -> FillResult<()> {
        self.persist(&self.state)
    }

    /// Overlay stored fields onto the current state.
    ///
    /// Returns `false` when nothing was stored, or when the stored document
    /// could not be read back; in the latter case the current state is kept
    /// and a warning is logged.
    pub fn load_from_storage(&mut self) -> FillResult<bool> {
        let Some(raw) = self.storage.get(&self.key)? else {
            debug!(key = %self.key, "no stored fill session");
            return Ok(false);
        };
        match restore_overlay(&self.state, &raw, &self.key) {
            Ok(restored) => {
                self.state = restored;
                debug!(key = %self.key, active = self.state.is_active(), "restored fill session");
                Ok(true)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "ignoring unreadable fill session");
                Ok(false)
            }
        }
    }

    fn persist(&self, state: &FillSessionState) -> FillResult<()> {
        let json = serde_json::to_string(state).map_err(cf_storage::StorageError::from)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }
}
