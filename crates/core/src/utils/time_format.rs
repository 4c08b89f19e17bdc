//! Clock formatting and parsing for the remote's timers and time inputs.

/// Splits a second count into hours, minutes and seconds.
pub fn split_hms(secs: u64) -> (u64, u64, u64) {
    (secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Joins hour/minute/second fields back into a second count.
///
/// Fields come from free-form inputs; anything that does not parse as a
/// non-negative integer counts as zero.
pub fn join_hms(hours: &str, minutes: &str, seconds: &str) -> u64 {
    let field = |value: &str| value.trim().parse::<u64>().unwrap_or(0);
    field(hours) * 3600 + field(minutes) * 60 + field(seconds)
}

/// Formats seconds as `H:MM:SS` with unpadded hours.
///
/// # Example
/// ```
/// use keymote_core::utils::time_format::format_hms;
///
/// assert_eq!(format_hms(3661), "1:01:01");
/// ```
pub fn format_hms(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    format!("{h}:{m:02}:{s:02}")
}

/// Formats seconds as `M:SS`; minutes are not wrapped into hours.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Parses a planned-time input.
///
/// Accepts `M:SS` (seconds below 60) or a bare number of seconds. Returns
/// `None` for anything else, including negative values.
///
/// # Example
/// ```
/// use keymote_core::utils::time_format::parse_time_input;
///
/// assert_eq!(parse_time_input("1:30"), Some(90));
/// assert_eq!(parse_time_input("90"), Some(90));
/// assert_eq!(parse_time_input("1:70"), None);
/// ```
pub fn parse_time_input(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains(':') {
        let mut parts = input.split(':');
        let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
            (Some(m), Some(s), None) => (m.trim().parse::<u64>().ok()?, s.trim().parse::<u64>().ok()?),
            _ => return None,
        };
        if seconds >= 60 {
            return None;
        }
        return Some(minutes * 60 + seconds);
    }

    input.parse::<u64>().ok()
}

/// Formats a schedule delta (planned minus elapsed) for the tracking display.
///
/// Ahead of schedule by at least a second renders `+M:SS`, behind renders
/// `-M:SS`, anything in between is `0:00`.
pub fn format_tracking(diff: i64) -> String {
    let magnitude = format_mm_ss(diff.unsigned_abs());
    if diff <= -1 {
        format!("-{magnitude}")
    } else if diff >= 1 {
        format!("+{magnitude}")
    } else {
        "0:00".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_hms(0), "0:00:00");
        assert_eq!(format_hms(59), "0:00:59");
        assert_eq!(format_hms(3661), "1:01:01");
        assert_eq!(format_hms(36_000), "10:00:00");
    }

    #[test]
    fn formats_minutes_without_wrapping() {
        assert_eq!(format_mm_ss(0), "0:00");
        assert_eq!(format_mm_ss(125), "2:05");
        assert_eq!(format_mm_ss(3600), "60:00");
    }

    #[test]
    fn parses_colon_and_plain_inputs() {
        assert_eq!(parse_time_input("1:30"), Some(90));
        assert_eq!(parse_time_input(" 2:00 "), Some(120));
        assert_eq!(parse_time_input("0:05"), Some(5));
        assert_eq!(parse_time_input("90"), Some(90));
        assert_eq!(parse_time_input("0"), Some(0));
    }

    #[test]
    fn rejects_malformed_inputs() {
        assert_eq!(parse_time_input(""), None);
        assert_eq!(parse_time_input("   "), None);
        assert_eq!(parse_time_input("1:70"), None);
        assert_eq!(parse_time_input("1:60"), None);
        assert_eq!(parse_time_input("1:2:3"), None);
        assert_eq!(parse_time_input("abc"), None);
        assert_eq!(parse_time_input("-5"), None);
        assert_eq!(parse_time_input(":30"), None);
    }

    #[test]
    fn tracking_uses_one_second_dead_zone() {
        assert_eq!(format_tracking(0), "0:00");
        assert_eq!(format_tracking(75), "+1:15");
        assert_eq!(format_tracking(-61), "-1:01");
        assert_eq!(format_tracking(1), "+0:01");
        assert_eq!(format_tracking(-1), "-0:01");
    }

    #[test]
    fn hms_fields_round_trip_through_inputs() {
        assert_eq!(split_hms(3723), (1, 2, 3));
        assert_eq!(join_hms("1", "2", "3"), 3723);
        assert_eq!(join_hms("", "x", "7"), 7);
    }
}
