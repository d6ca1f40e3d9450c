//! Linear fill model.
//!
//! Gas quantities are "free gas" litres: pressure in bar times water
//! volume in litres. The compressor is assumed to deliver a constant
//! volumetric rate, so pressure rises linearly with time.

use cf_core::{
    Pressure, Time, UnixSeconds, Volume, bar, in_bar, in_litres, in_lpm, litres, s,
};

use crate::params::FillParameters;

fn free_gas(pressure: Pressure, cylinder_size: Volume) -> Volume {
    litres(in_bar(pressure) * in_litres(cylinder_size))
}

/// Time needed to go from the starting to the target pressure.
pub fn calculate_fill_time(params: &FillParameters) -> Time {
    let pressure_delta = params.target_pressure() - params.starting_pressure();
    let litre_delta = free_gas(pressure_delta, params.cylinder_size());
    s(in_litres(litre_delta) / (in_lpm(params.fill_rate()) / 60.0))
}

/// Free gas already in the cylinder before the fill starts.
pub fn get_initial_litres(params: &FillParameters) -> Volume {
    free_gas(params.starting_pressure(), params.cylinder_size())
}

/// Free gas delivered between `start_time` and `now`.
///
/// Negative when `now` is before `start_time`.
pub fn guesstimate_litres_filled(
    params: &FillParameters,
    start_time: UnixSeconds,
    now: UnixSeconds,
) -> Volume {
    let time_delta = now - start_time;
    litres(time_delta * (in_lpm(params.fill_rate()) / 60.0))
}

/// Extrapolated cylinder pressure at `now`.
pub fn guesstimate_pressure(
    params: &FillParameters,
    start_time: UnixSeconds,
    now: UnixSeconds,
) -> Pressure {
    let litres_filled = guesstimate_litres_filled(params, start_time, now);
    let initial_litres = get_initial_litres(params);
    bar((in_litres(initial_litres) + in_litres(litres_filled)) / in_litres(params.cylinder_size()))
}
