//! Human-readable durations for timelocks and confirmation estimates.

use std::time::Duration;

const UNITS: [(&str, u64); 4] = [("day", 86_400), ("hour", 3_600), ("minute", 60), ("second", 1)];

/// Render a duration using its two largest non-zero units.
///
/// `format_duration(Duration::from_secs(183_600))` is `"2 days 3 hours"`.
/// Sub-second durations render as `"less than a second"`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let mut remaining = duration.as_secs();
    if remaining == 0 {
        return "less than a second".into();
    }

    let mut parts = Vec::with_capacity(2);
    for (name, size) in UNITS {
        if parts.len() == 2 {
            break;
        }
        let count = remaining / size;
        if count > 0 {
            remaining %= size;
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {name}{plural}"));
        } else if !parts.is_empty() {
            // Only adjacent units are combined.
            break;
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_and_hours() {
        assert_eq!(format_duration(Duration::from_secs(183_600)), "2 days 3 hours");
    }

    #[test]
    fn single_unit_is_singular() {
        assert_eq!(format_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(format_duration(Duration::from_secs(1)), "1 second");
    }

    #[test]
    fn seconds_only() {
        assert_eq!(format_duration(Duration::from_millis(30_000)), "30 seconds");
    }

    #[test]
    fn non_adjacent_units_are_dropped() {
        assert_eq!(format_duration(Duration::from_secs(86_400 + 300)), "1 day");
    }

    #[test]
    fn sub_second() {
        assert_eq!(format_duration(Duration::from_millis(400)), "less than a second");
    }
}
