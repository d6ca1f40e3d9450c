//! CSV export of the fill log.

use std::borrow::Cow;

use cf_core::{CoreResult, ReportZone};

use crate::types::LogEntryEnhanced;

pub const EXPORT_HEADER: &str = "ID,Start Time,End Time,Cylinder Size (L),Starting Pressure (bar),Target Pressure (bar),Duration (seconds),Fill Rate (L/min)";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Quote a field only if it would otherwise break the row.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Fixed-point rendering with exact ties rounded away from zero.
///
/// `format!` rounds a tie such as `1234.25` to even (`1234.2`); exported
/// files carry `1234.3`. Non-finite values render as `Infinity`,
/// `-Infinity` or `NaN`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let exp = i32::try_from(digits).unwrap_or(i32::MAX);
    let scale = 10f64.powi(exp);
    let scaled = value * scale;
    // Only a value with at most `digits + 1` binary-exact decimals can be a
    // tie, and then `scaled` is exact.
    let is_tie = (value * 2f64.powi(exp.saturating_add(1))).fract() == 0.0
        && scaled.fract().abs() == 0.5;
    if is_tie {
        let rounded = scaled + 0.5 * scaled.signum();
        format!("{:.*}", digits, rounded / scale)
    } else {
        format!("{:.*}", digits, value)
    }
}

fn render_row(entry: &LogEntryEnhanced, zone: &ReportZone) -> CoreResult<String> {
    let fields = [
        entry.id.to_string(),
        zone.format(entry.start_time, TIMESTAMP_FORMAT)?,
        zone.format(entry.end_time, TIMESTAMP_FORMAT)?,
        entry.cylinder_size.to_string(),
        entry.starting_pressure.to_string(),
        entry.target_pressure.to_string(),
        to_fixed(entry.duration, 1),
        to_fixed(entry.fill_rate, 2),
    ];
    Ok(fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(","))
}

/// Header plus one row per entry, in the order given, joined by `\n`
/// without a trailing newline.
pub fn render_export(entries: &[LogEntryEnhanced], zone: &ReportZone) -> CoreResult<String> {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    for entry in entries {
        lines.push(render_row(entry, zone)?);
    }
    Ok(lines.join("\n"))
}
