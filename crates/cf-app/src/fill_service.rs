//! Fill session + fill log, opened together.

use std::sync::Arc;

use cf_core::{
    Clock, EntryId, ReportZone, SystemClock, UnixSeconds, in_bar, in_litres, in_seconds,
};
use cf_fill::{FillStore, PartialFillParameters};
use cf_log::{LogEntry, LogStats, LogStore, NewLogEntry, generate_fake_log_entry};
use cf_storage::{FileStore, KeyValueStore};
use rand::Rng;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::progress::{FillProgress, FillStage};

pub struct FillService {
    fill: FillStore,
    log: LogStore,
    clock: Arc<dyn Clock>,
    zone: ReportZone,
    debug_features: bool,
}

impl FillService {
    /// Open the file-backed stores under `config.data_dir` using the system
    /// clock, restoring whatever was stored.
    pub fn open(config: &Config) -> AppResult<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone())?);
        Self::with_backend(config, storage, Arc::new(SystemClock))
    }

    /// Open over any backing store and clock.
    pub fn with_backend(
        config: &Config,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let zone = config.report_zone()?;
        let mut fill = FillStore::with_defaults(storage.clone(), clock.clone(), config.defaults);
        let mut log = LogStore::new(storage, zone);
        fill.load_from_storage()?;
        log.load_from_storage()?;

        Ok(Self {
            fill,
            log,
            clock,
            zone,
            debug_features: config.debug_features,
        })
    }

    pub fn fill(&self) -> &FillStore {
        &self.fill
    }

    pub fn log(&self) -> &LogStore {
        &self.log
    }

    pub fn zone(&self) -> &ReportZone {
        &self.zone
    }

    pub fn now(&self) -> UnixSeconds {
        self.clock.now()
    }

    /// Merge `params` into the session and save it.
    pub fn set_parameters(&mut self, params: &PartialFillParameters) -> AppResult<()> {
        self.fill.set_fill_parameters(params);
        self.fill.write_to_storage()?;
        Ok(())
    }

    pub fn start(&mut self) -> AppResult<UnixSeconds> {
        Ok(self.fill.start_filling()?)
    }

    /// Abandon the running fill without logging it.
    pub fn stop(&mut self) -> AppResult<()> {
        self.fill.stop_filling()?;
        Ok(())
    }

    /// Log the running fill as completed now, then stop the session.
    ///
    /// If the session cannot be stopped the new entry is removed again, so a
    /// retry does not log the fill twice.
    pub fn finish_fill(&mut self) -> AppResult<LogEntry> {
        let start_time = self.fill.state().start_time.ok_or(AppError::NotFilling)?;
        let params = self.fill.get_fill_parameters()?;
        let end_time = self.clock.now();

        let entry = self.log.add_log_entry(NewLogEntry {
            cylinder_size: in_litres(params.cylinder_size()),
            starting_pressure: in_bar(params.starting_pressure()),
            target_pressure: in_bar(params.target_pressure()),
            start_time,
            end_time,
        })?;
        if let Err(err) = self.fill.stop_filling() {
            if let Err(rollback) = self.log.delete_log_entry(&entry.id) {
                warn!(id = %entry.id, error = %rollback, "could not roll back log entry");
            }
            return Err(err.into());
        }

        info!(id = %entry.id, duration_s = entry.duration(), "fill finished");
        Ok(entry)
    }

    /// Use today's average realized rate, else the all-time average, as the
    /// session fill rate. Returns the rate applied, if any.
    pub fn apply_fill_rate_from_log(&mut self) -> AppResult<Option<f64>> {
        let stats = self.log.get_log_stats(self.clock.now())?;
        let Some(rate) = stats.fill_rate_today.or(stats.fill_rate_all) else {
            return Ok(None);
        };
        self.fill.set_fill_rate_from_log(rate);
        self.fill.write_to_storage()?;
        info!(rate_lpm = rate, "fill rate taken from log");
        Ok(Some(rate))
    }

    pub fn stats(&self) -> AppResult<LogStats> {
        Ok(self.log.get_log_stats(self.clock.now())?)
    }

    pub fn export_csv(&self) -> AppResult<String> {
        Ok(self.log.get_export_text()?)
    }

    pub fn delete_entry(&mut self, id: &EntryId) -> AppResult<bool> {
        Ok(self.log.delete_log_entry(id)?)
    }

    /// Add `count` synthetic fills. Only with debug features enabled.
    pub fn seed_fake_entries<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> AppResult<Vec<LogEntry>> {
        if !self.debug_features {
            return Err(AppError::DebugFeaturesDisabled);
        }
        let mut added = Vec::with_capacity(count);
        for _ in 0..count {
            added.push(generate_fake_log_entry(&mut self.log, &mut *rng)?);
        }
        info!(count, "seeded fake log entries");
        Ok(added)
    }

    /// Reset the session (and optionally the log) and save.
    pub fn reset(&mut self, include_log: bool) -> AppResult<()> {
        self.fill.reset_store();
        self.fill.write_to_storage()?;
        if include_log {
            self.log.reset_store();
            self.log.write_to_storage()?;
        }
        Ok(())
    }

    /// Snapshot of the session at `now`.
    pub fn progress(&self, now: UnixSeconds) -> AppResult<FillProgress> {
        let state = self.fill.state();
        let (Some(start), Some(end)) = (state.start_time, state.end_time) else {
            let pressure = self.fill.get_current_pressure(now)?.map(in_bar);
            return Ok(FillProgress::idle(now, pressure, state.target_pressure));
        };

        let remaining_s = self.fill.get_fill_time_remaining(now).map(in_seconds);
        let litres_filled = self.fill.get_litres_filled(now)?.map(in_litres);
        let current_pressure_bar = self.fill.get_current_pressure(now)?.map(in_bar);
        let total = end - start;
        let fraction_complete = if total > 0.0 {
            ((now - start) / total).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let stage = if remaining_s == Some(0.0) {
            FillStage::Overdue
        } else {
            FillStage::Filling
        };

        Ok(FillProgress {
            stage,
            now,
            remaining_s,
            litres_filled,
            current_pressure_bar,
            target_pressure_bar: state.target_pressure,
            fraction_complete: Some(fraction_complete),
        })
    }
}
