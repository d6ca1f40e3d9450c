//! Fill parameters and their validation.

use core::fmt;

use cf_core::{Pressure, Volume, VolumeRate, bar, in_bar, in_litres, in_lpm, litres, lpm};
use serde::{Deserialize, Serialize};

/// One of the four user-supplied fill parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillField {
    CylinderSize,
    StartingPressure,
    FillRate,
    TargetPressure,
}

impl FillField {
    pub const ALL: [FillField; 4] = [
        FillField::CylinderSize,
        FillField::StartingPressure,
        FillField::FillRate,
        FillField::TargetPressure,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FillField::CylinderSize => "cylinderSize",
            FillField::StartingPressure => "startingPressure",
            FillField::FillRate => "fillRate",
            FillField::TargetPressure => "targetPressure",
        }
    }
}

impl fmt::Display for FillField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing value: {field}")]
    Missing { field: FillField },

    #[error("Invalid value: {field} = {value} (must be finite)")]
    NonFinite { field: FillField, value: f64 },

    #[error("Invalid value: {field} = {value} (must be greater than zero)")]
    NonPositive { field: FillField, value: f64 },

    #[error("Invalid value: {field} = {value} (must not be negative)")]
    Negative { field: FillField, value: f64 },

    #[error("starting pressure {starting} bar must not exceed target pressure {target} bar")]
    StartAboveTarget { starting: f64, target: f64 },
}

/// Any subset of the fill parameters, in bar / litres / L/min.
///
/// `None` means "leave unchanged" when merged into a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialFillParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinder_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pressure: Option<f64>,
}

impl PartialFillParameters {
    pub fn get(&self, field: FillField) -> Option<f64> {
        match field {
            FillField::CylinderSize => self.cylinder_size,
            FillField::StartingPressure => self.starting_pressure,
            FillField::FillRate => self.fill_rate,
            FillField::TargetPressure => self.target_pressure,
        }
    }

    pub fn is_empty(&self) -> bool {
        FillField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Validate into a complete parameter set.
    ///
    /// Besides presence and `starting <= target`, rejects non-finite values,
    /// a non-positive cylinder size or fill rate, and a negative starting
    /// pressure.
    pub fn validate(&self) -> Result<FillParameters, ValidationError> {
        let require = |field: FillField| {
            let value = self.get(field).ok_or(ValidationError::Missing { field })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ValidationError::NonFinite { field, value })
            }
        };

        let cylinder_size = require(FillField::CylinderSize)?;
        let starting_pressure = require(FillField::StartingPressure)?;
        let fill_rate = require(FillField::FillRate)?;
        let target_pressure = require(FillField::TargetPressure)?;

        if cylinder_size <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: FillField::CylinderSize,
                value: cylinder_size,
            });
        }
        if fill_rate <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: FillField::FillRate,
                value: fill_rate,
            });
        }
        if starting_pressure < 0.0 {
            return Err(ValidationError::Negative {
                field: FillField::StartingPressure,
                value: starting_pressure,
            });
        }
        if starting_pressure > target_pressure {
            return Err(ValidationError::StartAboveTarget {
                starting: starting_pressure,
                target: target_pressure,
            });
        }

        Ok(FillParameters {
            cylinder_size: litres(cylinder_size),
            starting_pressure: bar(starting_pressure),
            fill_rate: lpm(fill_rate),
            target_pressure: bar(target_pressure),
        })
    }
}

/// A complete, validated parameter set for one fill.
///
/// Only obtainable through [`FillParameters::new`] or
/// [`PartialFillParameters::validate`], so `starting_pressure <= target_pressure`,
/// `cylinder_size > 0` and `fill_rate > 0` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillParameters {
    cylinder_size: Volume,
    starting_pressure: Pressure,
    fill_rate: VolumeRate,
    target_pressure: Pressure,
}

impl FillParameters {
    /// Build from bar / litres / L/min.
    pub fn new(
        cylinder_size_l: f64,
        starting_pressure_bar: f64,
        fill_rate_lpm: f64,
        target_pressure_bar: f64,
    ) -> Result<Self, ValidationError> {
        PartialFillParameters {
            cylinder_size: Some(cylinder_size_l),
            starting_pressure: Some(starting_pressure_bar),
            fill_rate: Some(fill_rate_lpm),
            target_pressure: Some(target_pressure_bar),
        }
        .validate()
    }

    pub fn cylinder_size(&self) -> Volume {
        self.cylinder_size
    }

    pub fn starting_pressure(&self) -> Pressure {
        self.starting_pressure
    }

    pub fn fill_rate(&self) -> VolumeRate {
        self.fill_rate
    }

    pub fn target_pressure(&self) -> Pressure {
        self.target_pressure
    }

    pub fn to_partial(&self) -> PartialFillParameters {
        PartialFillParameters {
            cylinder_size: Some(in_litres(self.cylinder_size)),
            starting_pressure: Some(in_bar(self.starting_pressure)),
            fill_rate: Some(in_lpm(self.fill_rate)),
            target_pressure: Some(in_bar(self.target_pressure)),
        }
    }
}
