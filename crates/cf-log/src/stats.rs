//! Day-bucketed fill rate statistics.

use cf_core::{CoreResult, ReportZone, UnixSeconds, finite_mean};

use crate::types::{LogEntryEnhanced, LogStats};

/// Average realized fill rates for the reference day and for all time.
///
/// An entry counts towards "today" when its start time falls on the same
/// calendar day as `reference` in `zone`. Zero-length fills (infinite rate)
/// are left out of both averages.
pub fn compute_stats(
    entries: &[LogEntryEnhanced],
    reference: UnixSeconds,
    zone: &ReportZone,
) -> CoreResult<LogStats> {
    let today = zone.calendar_day(reference)?;

    let mut today_rates = Vec::new();
    for entry in entries {
        if zone.calendar_day(entry.start_time)? == today {
            today_rates.push(entry.fill_rate);
        }
    }

    Ok(LogStats {
        log_count: entries.len(),
        fill_rate_today: finite_mean(today_rates),
        fill_rate_all: finite_mean(entries.iter().map(|e| e.fill_rate)),
    })
}
