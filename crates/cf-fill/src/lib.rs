//! Fill session engine.
//!
//! Validates fill parameters, computes how long a fill takes, and
//! extrapolates pressure and delivered volume while a fill is running.
//!
//! # Architecture
//!
//! - [`math`]: pure functions over validated [`FillParameters`]
//! - [`params`]: raw (optional) parameters, validation, [`ValidationError`]
//! - [`session`]: the persisted [`FillSessionState`]
//! - [`store`]: [`FillStore`], the idle/active state machine plus persistence
//!
//! The engine never reads a timer on its own. Live progress is a function of
//! stored state and a caller-supplied `now`.

pub mod error;
pub mod math;
pub mod params;
pub mod session;
pub mod store;

pub use error::{FillError, FillResult};
pub use math::{
    calculate_fill_time, get_initial_litres, guesstimate_litres_filled, guesstimate_pressure,
};
pub use params::{FillField, FillParameters, PartialFillParameters, ValidationError};
pub use session::{FillSessionState, SessionDefaults};
pub use store::{FILL_STORAGE_NAME, FILL_STORAGE_VERSION, FillStore};
