// cf-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, Time as UomTime, Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn litres(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

/// Volumetric flow in litres per minute (the unit compressors are rated in).
#[inline]
pub fn lpm(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_second;
    VolumeRate::new::<liter_per_second>(v / 60.0)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn in_bar(p: Pressure) -> f64 {
    use uom::si::pressure::bar;
    p.get::<bar>()
}

#[inline]
pub fn in_litres(v: Volume) -> f64 {
    use uom::si::volume::liter;
    v.get::<liter>()
}

#[inline]
pub fn in_lpm(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::liter_per_second;
    q.get::<liter_per_second>() * 60.0
}

#[inline]
pub fn in_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

pub mod constants {
    /// Fill rate assumed for a fresh session, in L/min.
    pub const DEFAULT_FILL_RATE_LPM: f64 = 110.0;
    /// Cylinder size assumed for a fresh session, in litres.
    pub const DEFAULT_CYLINDER_SIZE_L: f64 = 12.0;
    /// Working pressure of a standard 232 bar cylinder.
    pub const DEFAULT_TARGET_PRESSURE_BAR: f64 = 232.0;
}
