use cf_core::{UnixSeconds, format_time_period_hms, get_time_period};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStage {
    Idle,
    Filling,
    /// Projected end time has passed but the fill was not stopped yet.
    Overdue,
}

impl FillStage {
    pub fn label(&self) -> &'static str {
        match self {
            FillStage::Idle => "idle",
            FillStage::Filling => "filling",
            FillStage::Overdue => "complete",
        }
    }
}

/// Everything a front end shows for the current fill at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct FillProgress {
    pub stage: FillStage,
    pub now: UnixSeconds,
    pub remaining_s: Option<f64>,
    pub litres_filled: Option<f64>,
    pub current_pressure_bar: Option<f64>,
    pub target_pressure_bar: Option<f64>,
    /// 0 at start, 1 at the projected end.
    pub fraction_complete: Option<f64>,
}

impl FillProgress {
    pub fn idle(now: UnixSeconds, pressure_bar: Option<f64>, target_bar: Option<f64>) -> Self {
        Self {
            stage: FillStage::Idle,
            now,
            remaining_s: None,
            litres_filled: None,
            current_pressure_bar: pressure_bar,
            target_pressure_bar: target_bar,
            fraction_complete: None,
        }
    }

    /// Remaining time as `1h 2m 3s`.
    pub fn remaining_formatted(&self) -> Option<String> {
        self.remaining_s
            .map(|r| format_time_period_hms(&get_time_period(r)))
    }
}
