//! Relative time labels for poll cards ("3d 4h left", "2mo ago").

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeTime {
    pub text: String,
    /// `target` lies strictly before `now`.
    pub is_passed: bool,
}

/// Describe `target` relative to `now`.
///
/// Future instants read `"{d}d {h}h"`. Past instants use the coarsest unit
/// that fits: years, months (30 days), `"{d}d {h}h"`, `"{h}h {m}m"` or
/// minutes. With `suffix`, `" left"` or `" ago"` is appended.
pub fn relative_time(target: DateTime<Utc>, now: DateTime<Utc>, suffix: bool) -> RelativeTime {
    let diff_ms = (target - now).num_milliseconds();
    let minutes = diff_ms.unsigned_abs() / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    let mut text = if diff_ms > 0 {
        format!("{days}d {}h", hours % 24)
    } else if years >= 1 {
        format!("{years}y")
    } else if months >= 1 {
        format!("{months}mo")
    } else if days >= 1 {
        format!("{days}d {}h", hours % 24)
    } else if hours >= 1 {
        format!("{hours}h {}m", minutes % 60)
    } else {
        format!("{minutes}m")
    };

    if suffix {
        text.push_str(if diff_ms > 0 { " left" } else { " ago" });
    }

    RelativeTime {
        text,
        is_passed: diff_ms < 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_future_uses_days_and_hours() {
        let t = now() + Duration::days(3) + Duration::hours(4) + Duration::minutes(10);
        assert_eq!(relative_time(t, now(), true).text, "3d 4h left");

        let soon = now() + Duration::minutes(30);
        let rel = relative_time(soon, now(), true);
        assert_eq!(rel.text, "0d 0h left");
        assert!(!rel.is_passed);
    }

    #[test]
    fn test_past_picks_coarsest_unit() {
        let cases = [
            (Duration::days(400), "1y ago"),
            (Duration::days(65), "2mo ago"),
            (Duration::days(2) + Duration::hours(5), "2d 5h ago"),
            (Duration::hours(3) + Duration::minutes(7), "3h 7m ago"),
            (Duration::minutes(12), "12m ago"),
        ];
        for (ago, expected) in cases {
            let rel = relative_time(now() - ago, now(), true);
            assert_eq!(rel.text, expected);
            assert!(rel.is_passed);
        }
    }

    #[test]
    fn test_without_suffix() {
        let rel = relative_time(now() - Duration::minutes(5), now(), false);
        assert_eq!(rel.text, "5m");
    }

    #[test]
    fn test_exact_now_is_not_passed() {
        let rel = relative_time(now(), now(), true);
        assert_eq!(rel.text, "0m ago");
        assert!(!rel.is_passed);
    }
}
