//! User-facing formatting helpers.

/// Formats a fractional hour count the way the bot reports lab time.
///
/// Durations under one hour are reported in minutes only.
#[must_use]
pub fn pretty_hours(hours: f64) -> String {
    let whole_hours = hours as i64;
    let minutes = ((hours - whole_hours as f64) * 60.0) as i64;
    if hours < 1.0 {
        format!("{minutes} minutes")
    } else {
        format!("{whole_hours}h {minutes}min")
    }
}
