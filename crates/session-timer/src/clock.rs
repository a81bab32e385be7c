//! `HH:MM:SS` formatting and parsing

use std::time::Duration;

use crate::TimeParseError;

/// Largest accepted hours field, a little over a century
pub const MAX_HOURS: u64 = 999_999;

/// Format whole seconds as `HH:MM:SS`; fractions are truncated
pub fn format_hms(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Parse `HH:MM:SS` (hours up to [`MAX_HOURS`], minutes and seconds below 60)
pub fn parse_hms(text: &str) -> Result<Duration, TimeParseError> {
    let fields: Vec<&str> = text.trim().split(':').collect();
    let [h, m, s] = fields.as_slice() else {
        return Err(TimeParseError::FieldCount(fields.len()));
    };

    let hours = parse_field("hours", h)?;
    let minutes = parse_field("minutes", m)?;
    let seconds = parse_field("seconds", s)?;

    for (field, value, max) in [
        ("hours", hours, MAX_HOURS),
        ("minutes", minutes, 59),
        ("seconds", seconds, 59),
    ] {
        if value > max {
            return Err(TimeParseError::OutOfRange { field, value, max });
        }
    }

    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

fn parse_field(field: &'static str, value: &str) -> Result<u64, TimeParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| TimeParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
