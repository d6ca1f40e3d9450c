//! Synthetic log entries for demos.

use cf_core::in_seconds;
use cf_fill::{FillParameters, calculate_fill_time};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::LogResult;
use crate::store::LogStore;
use crate::types::{LogEntry, NewLogEntry};

/// Cylinder sizes in litres, repeated to weight the draw towards 12 L.
const CYLINDER_SIZES: [f64; 7] = [12.0, 12.0, 12.0, 12.0, 15.0, 7.0, 24.0];
const TARGET_PRESSURE_BAR: f64 = 232.0;

pub fn choose<'a, T, R: Rng + ?Sized>(rng: &mut R, choices: &'a [T]) -> Option<&'a T> {
    choices.choose(rng)
}

/// Uniform draw in `[min, max]`, rounded to the nearest integer.
pub fn number_in_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    (rng.r#gen::<f64>() * (max - min) + min).round()
}

/// Add a plausible random fill to `store`, starting at the epoch.
pub fn generate_fake_log_entry<R: Rng + ?Sized>(
    store: &mut LogStore,
    rng: &mut R,
) -> LogResult<LogEntry> {
    let cylinder_size = choose(rng, &CYLINDER_SIZES)
        .copied()
        .unwrap_or(CYLINDER_SIZES[0]);
    let starting_pressure = number_in_range(rng, 20.0, 150.0);
    let fill_rate = number_in_range(rng, 90.0, 150.0);

    let params = FillParameters::new(
        cylinder_size,
        starting_pressure,
        fill_rate,
        TARGET_PRESSURE_BAR,
    )
    .map_err(cf_fill::FillError::from)?;
    let duration = in_seconds(calculate_fill_time(&params));

    store.add_log_entry(NewLogEntry {
        cylinder_size,
        starting_pressure,
        target_pressure: TARGET_PRESSURE_BAR,
        start_time: 0.0,
        end_time: duration,
    })
}
