//! Compact human display of elapsed seconds: `1h 1m`, `2m 5s`, `45s`.

use chrono::{DateTime, Utc};
use crate::errors::{AppError, AppResult};

const MINUTE: u64 = 60;
const HOUR: u64 = 3600;

pub fn format_duration(seconds: u64) -> String {
    if seconds >= HOUR {
        format!("{}h {}m", seconds / HOUR, (seconds % HOUR) / MINUTE)
    } else if seconds >= MINUTE {
        format!("{}m {}s", seconds / MINUTE, seconds % MINUTE)
    } else {
        format!("{}s", seconds)
    }
}

/// Inverse of [`format_duration`]. Only its three shapes are accepted: `Ns`, `Nm Ns` and
/// `Nh Nm`. Dropped components read back as zero, so `parse_duration(format_duration(s))`
/// lands in the same hour/minute bucket as `s`.
pub fn parse_duration(text: &str) -> AppResult<u64> {
    let invalid = || AppError::Validation(format!("Invalid duration: {:?}", text));
    let parts: Vec<(u64, char)> = text
        .split(' ')
        .map(component)
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;
    let total = match parts.as_slice() {
        [(s, 's')] if *s < MINUTE => *s,
        [(m, 'm'), (s, 's')] if (1..MINUTE).contains(m) && *s < MINUTE => m * MINUTE + s,
        [(h, 'h'), (m, 'm')] if *h >= 1 && *m < MINUTE => h
            .checked_mul(HOUR)
            .and_then(|v| v.checked_add(m * MINUTE))
            .ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    Ok(total)
}

/// One `<digits><unit>` token. No sign, no leading zeros.
fn component(part: &str) -> Option<(u64, char)> {
    let mut chars = part.chars();
    let unit = chars.next_back()?;
    let digits = chars.as_str();
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !well_formed {
        return None;
    }
    digits.parse().ok().map(|value| (value, unit))
}

/// Whole seconds from `start` to `end`. Fails when `end` precedes `start`.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<u64> {
    let millis = (end - start).num_milliseconds();
    if millis < 0 {
        return Err(AppError::Validation(
            "End time must not be before start time".to_string(),
        ));
    }
    Ok((millis / 1000) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn formats_each_bucket() {
        assert_eq!(format_duration(3661), "1h 1m");
        assert_eq!(format_duration(3600), "1h 0m");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(36_000 + 59 * 60 + 59), "10h 59m");
    }

    #[test]
    fn parse_lands_in_same_bucket() {
        for s in [0u64, 1, 59, 60, 61, 125, 3599, 3600, 3661, 7322, 90_061] {
            let back = parse_duration(&format_duration(s)).unwrap();
            if s >= HOUR {
                assert_eq!(back / HOUR, s / HOUR);
                assert_eq!((back % HOUR) / MINUTE, (s % HOUR) / MINUTE);
            } else {
                assert_eq!(back, s);
            }
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3x").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn parse_accepts_only_formatted_shapes() {
        assert_eq!(parse_duration("45s").unwrap(), 45);
        assert_eq!(parse_duration("2m 5s").unwrap(), 125);
        assert_eq!(parse_duration("1h 1m").unwrap(), 3660);
        for text in [
            "+5s", "1m 1m", "5s 1h", "1h", "5m", "60s", "1m 60s", "0m 5s", "0h 5m", "1h 60m",
            "05s", "1m  5s", " 5s", "5s ", "1h 1m 1s", "99999999999999999999h 0m",
        ] {
            assert!(parse_duration(text).is_err(), "{:?} should be rejected", text);
        }
    }

    #[test]
    fn elapsed_floors_to_whole_seconds() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let end = start + Duration::milliseconds(5_999);
        assert_eq!(elapsed_seconds(start, end).unwrap(), 5);
        assert_eq!(elapsed_seconds(start, start).unwrap(), 0);
    }

    #[test]
    fn negative_elapsed_is_an_error() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let end = start - Duration::seconds(1);
        assert!(matches!(elapsed_seconds(start, end), Err(AppError::Validation(_))));
    }
}
