//! Wall-clock helpers

use chrono::Utc;

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Coarse relative age of a timestamp: `42s ago`, `5m ago`, `3h ago`, `2d ago`.
/// Timestamps in the future read as `0s ago`.
pub fn format_time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms).max(0) / 1000;
    if seconds < 60 {
        return format!("{seconds}s ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0s ago")]
    #[case(59_999, "59s ago")]
    #[case(60_000, "1m ago")]
    #[case(45 * 60_000, "45m ago")]
    #[case(2 * 3_600_000, "2h ago")]
    #[case(23 * 3_600_000 + 59 * 60_000, "23h ago")]
    #[case(50 * 3_600_000, "2d ago")]
    #[case(-5_000, "0s ago")]
    fn test_format_time_ago(#[case] age_ms: i64, #[case] expected: &str) {
        let now = 1_700_000_000_000;
        assert_eq!(format_time_ago(now - age_ms, now), expected);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let now = 1_700_000_000_000;
        assert_eq!(format_time_ago(i64::MAX, now), "0s ago");
        assert_eq!(format_time_ago(i64::MIN, now), "106751991167d ago");
    }
}
