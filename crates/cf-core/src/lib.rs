//! cf-core: shared foundation for cylfill.
//!
//! Contains:
//! - units (uom SI types + bar/litre constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (unique log entry identifiers)
//! - time (durations as h/m/s, clocks, report time zones)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use time::*;
pub use units::*;
