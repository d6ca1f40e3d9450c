//! Persisted fill session state.

use cf_core::UnixSeconds;
use cf_core::constants::{
    DEFAULT_CYLINDER_SIZE_L, DEFAULT_FILL_RATE_LPM, DEFAULT_TARGET_PRESSURE_BAR,
};
use serde::{Deserialize, Serialize};

use crate::params::{FillField, PartialFillParameters};

/// Parameter values a fresh (or reset) session starts with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SessionDefaults {
    pub cylinder_size_l: Option<f64>,
    pub fill_rate_lpm: Option<f64>,
    pub target_pressure_bar: Option<f64>,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            cylinder_size_l: Some(DEFAULT_CYLINDER_SIZE_L),
            fill_rate_lpm: Some(DEFAULT_FILL_RATE_LPM),
            target_pressure_bar: Some(DEFAULT_TARGET_PRESSURE_BAR),
        }
    }
}

/// Everything the fill store keeps between runs.
///
/// Serialized flat, with absent values written as `null`:
/// `{"cylinderSize":12,"startingPressure":null,"fillRate":110,...}`.
/// `start_time` and `end_time` are either both set (a fill is running) or
/// both unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSessionState {
    pub cylinder_size: Option<f64>,
    pub starting_pressure: Option<f64>,
    pub fill_rate: Option<f64>,
    /// True when `fill_rate` was taken from the fill log rather than typed in.
    #[serde(default)]
    pub fill_rate_from_log: bool,
    pub target_pressure: Option<f64>,
    pub start_time: Option<UnixSeconds>,
    /// Projected completion, fixed when the fill starts.
    pub end_time: Option<UnixSeconds>,
}

impl Default for FillSessionState {
    fn default() -> Self {
        Self::with_defaults(SessionDefaults::default())
    }
}

impl FillSessionState {
    pub fn with_defaults(defaults: SessionDefaults) -> Self {
        Self {
            cylinder_size: defaults.cylinder_size_l,
            starting_pressure: None,
            fill_rate: defaults.fill_rate_lpm,
            fill_rate_from_log: false,
            target_pressure: defaults.target_pressure_bar,
            start_time: None,
            end_time: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn partial_parameters(&self) -> PartialFillParameters {
        PartialFillParameters {
            cylinder_size: self.cylinder_size,
            starting_pressure: self.starting_pressure,
            fill_rate: self.fill_rate,
            target_pressure: self.target_pressure,
        }
    }

    /// Merge the fields present in `params`. A new fill rate is treated as
    /// user-entered.
    pub fn apply(&mut self, params: &PartialFillParameters) {
        if let Some(v) = params.cylinder_size {
            self.cylinder_size = Some(v);
        }
        if let Some(v) = params.starting_pressure {
            self.starting_pressure = Some(v);
        }
        if let Some(v) = params.fill_rate {
            self.fill_rate = Some(v);
            self.fill_rate_from_log = false;
        }
        if let Some(v) = params.target_pressure {
            self.target_pressure = Some(v);
        }
    }

    pub fn clear(&mut self, field: FillField) {
        match field {
            FillField::CylinderSize => self.cylinder_size = None,
            FillField::StartingPressure => self.starting_pressure = None,
            FillField::FillRate => {
                self.fill_rate = None;
                self.fill_rate_from_log = false;
            }
            FillField::TargetPressure => self.target_pressure = None,
        }
    }
}
