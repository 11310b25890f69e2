//! Cooldown gate: minimum pause between two broadcasts.

use chrono::{DateTime, Duration, Utc};

/// Outcome of the cooldown gate.
#[derive(Debug, Clone, PartialEq)]
pub enum CooldownCheck {
    Pass,
    /// Carries the remaining wait and its formatted rendering.
    TooEarly {
        remaining: Duration,
        description: String,
    },
}

impl CooldownCheck {
    pub fn passed(&self) -> bool {
        matches!(self, CooldownCheck::Pass)
    }
}

/// Decide whether enough time has passed since the last broadcast.
///
/// Fails iff the elapsed time is strictly below `min_pause`: exact
/// equality passes. The elapsed time is the absolute difference, so a
/// last-alarm timestamp in the future (clock skew between devices) still
/// counts as recent. No prior alarm always passes.
pub fn check(
    last_alarm_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    min_pause: Duration,
    bypass: bool,
) -> CooldownCheck {
    let Some(last) = last_alarm_at else {
        return CooldownCheck::Pass;
    };
    let elapsed = (now - last).abs();
    if bypass || elapsed >= min_pause {
        CooldownCheck::Pass
    } else {
        let remaining = min_pause - elapsed;
        CooldownCheck::TooEarly {
            description: format_remaining(remaining),
            remaining,
        }
    }
}

/// Format a remaining wait for the user, rounding minutes up so the
/// message never promises less than the true wait.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    if secs < 60 {
        return format!("{secs} s");
    }
    let minutes = (secs as u64).div_ceil(60);
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} h")
    } else {
        format!("{hours} h {rest} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs_ago: i64) -> DateTime<Utc> {
        Utc::now() - Duration::seconds(secs_ago)
    }

    #[test]
    fn test_no_prior_alarm_passes() {
        assert!(check(None, Utc::now(), Duration::seconds(3_600), false).passed());
    }

    #[test]
    fn test_elapsed_equal_to_pause_passes() {
        let now = Utc::now();
        let last = now - Duration::seconds(600);
        assert!(check(Some(last), now, Duration::seconds(600), false).passed());
    }

    #[test]
    fn test_one_second_short_fails() {
        let now = Utc::now();
        let last = now - Duration::seconds(599);
        match check(Some(last), now, Duration::seconds(600), false) {
            CooldownCheck::TooEarly {
                remaining,
                description,
            } => {
                assert_eq!(remaining, Duration::seconds(1));
                assert_eq!(description, "1 s");
            }
            CooldownCheck::Pass => panic!("expected failure"),
        }
    }

    #[test]
    fn test_future_timestamp_counts_as_recent() {
        // A last alarm "ahead" of this device's clock must not pass for free.
        let now = Utc::now();
        let last = now + Duration::seconds(30);
        assert!(!check(Some(last), now, Duration::seconds(600), false).passed());
    }

    #[test]
    fn test_bypass_passes_zero_elapsed() {
        let now = Utc::now();
        assert!(check(Some(now), now, Duration::seconds(3_600), true).passed());
    }

    #[test]
    fn test_old_alarm_passes() {
        assert!(check(Some(at(7_200)), Utc::now(), Duration::seconds(3_600), false).passed());
    }

    #[test]
    fn test_format_remaining_cascade() {
        assert_eq!(format_remaining(Duration::seconds(42)), "42 s");
        assert_eq!(format_remaining(Duration::seconds(60)), "1 min");
        // 61 s rounds up to the next full minute.
        assert_eq!(format_remaining(Duration::seconds(61)), "2 min");
        assert_eq!(format_remaining(Duration::seconds(3_600)), "1 h");
        assert_eq!(format_remaining(Duration::seconds(4_500)), "1 h 15 min");
    }
}
