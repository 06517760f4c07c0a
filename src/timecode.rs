//! Timestamp string handling.
//!
//! Segmentation dumps and caption tracks both use `HH:MM:SS.ffffff` style
//! timestamps; internally everything is an integer millisecond offset.

use crate::error::{HvemError, Result};

/// Parse an `HH:MM:SS[.ffffff]` timestamp into milliseconds.
///
/// Hours and minutes must be integers; seconds may carry a fractional
/// component of any precision. The fractional part is rounded to the
/// nearest millisecond.
pub fn parse_timecode(s: &str) -> Result<u64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(HvemError::TimestampFormat(s.to_string()));
    }

    let hours: u64 = parts[0]
        .parse()
        .map_err(|_| HvemError::TimestampFormat(s.to_string()))?;
    let minutes: u64 = parts[1]
        .parse()
        .map_err(|_| HvemError::TimestampFormat(s.to_string()))?;
    let seconds: f64 = parts[2]
        .parse()
        .map_err(|_| HvemError::TimestampFormat(s.to_string()))?;

    if !(0.0..60.0).contains(&seconds) {
        return Err(HvemError::TimestampFormat(s.to_string()));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + (seconds * 1000.0).round() as u64)
}

/// Format milliseconds as `HH:MM:SS.mmm`.
///
/// The inverse of [`parse_timecode`] up to millisecond precision.
pub fn format_timecode(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1000;
    let millis = ms % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_seconds() {
        assert_eq!(parse_timecode("00:00:00").unwrap(), 0);
        assert_eq!(parse_timecode("00:01:00").unwrap(), 60_000);
        assert_eq!(parse_timecode("01:00:00").unwrap(), 3_600_000);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert_eq!(parse_timecode("00:00:00.000000").unwrap(), 0);
        assert_eq!(parse_timecode("00:00:01.500").unwrap(), 1500);
        // Rounds rather than truncates; 45.678 * 1000 is not exactly
        // representable in binary floating point.
        assert_eq!(parse_timecode("01:23:45.678").unwrap(), 5_025_678);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_timecode("12:34").is_err());
        assert!(parse_timecode("ab:cd:ef").is_err());
        assert!(parse_timecode("00:00:00:00").is_err());
        assert!(parse_timecode("").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_seconds() {
        // The seconds field never carries a minute; 60 would alias 00:01:00.
        assert!(parse_timecode("00:00:60").is_err());
        assert!(parse_timecode("00:00:60.000").is_err());
        assert!(parse_timecode("00:00:99.500").is_err());
    }

    #[test]
    fn test_parse_surfaces_offending_string() {
        match parse_timecode("not-a-time") {
            Err(HvemError::TimestampFormat(s)) => assert_eq!(s, "not-a-time"),
            other => panic!("expected TimestampFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format_timecode(0), "00:00:00.000");
        assert_eq!(format_timecode(5_025_678), "01:23:45.678");
    }

    #[test]
    fn test_round_trip() {
        for ms in [0u64, 1, 999, 1000, 61_001, 5_025_678, 86_399_999] {
            assert_eq!(parse_timecode(&format_timecode(ms)).unwrap(), ms);
        }
        // Six-digit fractions from pyannote dumps round-trip too.
        assert_eq!(
            parse_timecode("00:00:00.000000").unwrap(),
            parse_timecode(&format_timecode(0)).unwrap()
        );
    }
}
