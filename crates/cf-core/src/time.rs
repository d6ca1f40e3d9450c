//! Time utilities: durations as hours/minutes/seconds, human-readable
//! formatting, clocks, and the time zone used for calendar-day reporting.

use core::fmt;
use core::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::{CoreError, CoreResult, UnixSeconds};

/// A duration split into whole hours, whole minutes and (fractional) seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimePeriod {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

impl TimePeriod {
    pub fn new(hours: u64, minutes: u64, seconds: f64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Split a number of seconds. Negative input is treated as zero.
    pub fn from_seconds(t: f64) -> Self {
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
        let hours = (t / 3600.0).floor() as u64;
        let minutes = ((t % 3600.0) / 60.0).floor() as u64;
        let seconds = t % 60.0;
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_seconds(&self) -> f64 {
        self.hours as f64 * 3600.0 + self.minutes as f64 * 60.0 + self.seconds
    }

    /// Whole `(hours, minutes, seconds)` shown to the user. Partial seconds
    /// count as a full one so a countdown never reads zero while time is
    /// still left; a rounded-up 60 carries into the minutes.
    fn display_parts(&self) -> (u64, u64, u64) {
        let total = self.hours * 3600 + self.minutes * 60 + self.seconds.ceil() as u64;
        (total / 3600, (total % 3600) / 60, total % 60)
    }
}

pub fn get_time_period(t: f64) -> TimePeriod {
    TimePeriod::from_seconds(t)
}

/// Clock-style rendering: `59`, `1:05`, `1:01:01`.
pub fn format_time_period(t: &TimePeriod) -> String {
    let (hours, minutes, secs) = t.display_parts();
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}:{:02}", minutes, secs)
    } else {
        format!("{}", secs)
    }
}

/// Unit-suffixed rendering: `59s`, `1m 5s`, `1h 1m 1s`.
pub fn format_time_period_hms(t: &TimePeriod) -> String {
    let (hours, minutes, secs) = t.display_parts();
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> UnixSeconds;
}

/// Reads the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixSeconds {
        Utc::now().timestamp_micros() as f64 / 1e6
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(now: UnixSeconds) -> Self {
        Self {
            bits: AtomicU64::new(now.to_bits()),
        }
    }

    pub fn set(&self, now: UnixSeconds) {
        self.bits.store(now.to_bits(), Ordering::Relaxed);
    }

    pub fn advance(&self, dt: f64) {
        self.set(self.now() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixSeconds {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

fn to_utc(ts: UnixSeconds) -> CoreResult<DateTime<Utc>> {
    if !ts.is_finite() {
        return Err(CoreError::TimestampOutOfRange { value: ts });
    }
    let secs = ts.floor();
    let nanos = (((ts - secs) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos).ok_or(CoreError::TimestampOutOfRange { value: ts })
}

/// Time zone used to decide calendar days and to render timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportZone {
    /// Whatever the host reports as local time.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl ReportZone {
    /// Zone `hours` east of UTC.
    pub fn east_hours(hours: i32) -> CoreResult<Self> {
        FixedOffset::east_opt(hours * 3600)
            .map(Self::Fixed)
            .ok_or(CoreError::InvalidArg {
                what: "utc offset out of range",
            })
    }

    /// Calendar day containing `ts` in this zone.
    pub fn calendar_day(&self, ts: UnixSeconds) -> CoreResult<NaiveDate> {
        let utc = to_utc(ts)?;
        Ok(match self {
            Self::Local => utc.with_timezone(&Local).date_naive(),
            Self::Utc => utc.date_naive(),
            Self::Fixed(offset) => utc.with_timezone(offset).date_naive(),
        })
    }

    /// Render `ts` with a chrono `strftime` pattern.
    pub fn format(&self, ts: UnixSeconds, pattern: &str) -> CoreResult<String> {
        let utc = to_utc(ts)?;
        Ok(match self {
            Self::Local => utc.with_timezone(&Local).format(pattern).to_string(),
            Self::Utc => utc.format(pattern).to_string(),
            Self::Fixed(offset) => utc.with_timezone(offset).format(pattern).to_string(),
        })
    }
}

impl fmt::Display for ReportZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
            Self::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for ReportZone {
    type Err = CoreError;

    /// Accepts `local`, `utc`, or an offset such as `+01:00` / `-05:30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" => return Ok(Self::Utc),
            _ => {}
        }

        let invalid = || CoreError::InvalidTimeZone {
            value: s.to_string(),
        };
        let (sign, rest) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(invalid()),
        };
        let (h, m) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours: i32 = h.parse().map_err(|_| invalid())?;
        let minutes: i32 = m.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) {
            return Err(invalid());
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::Fixed)
            .ok_or_else(invalid)
    }
}
