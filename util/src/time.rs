//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Number of milliseconds in a second
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a number of seconds into whole milliseconds, saturating at zero for negative input.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if seconds <= 0.0 {
        0
    }
    else {
        (seconds * MILLIS_PER_SECOND).round() as u64
    }
}

/// Convert a number of milliseconds into seconds.
pub fn millis_to_seconds(millis: u64) -> f64 {
    millis as f64 / MILLIS_PER_SECOND
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(1500)), 
            Some(1.5)
        );
        assert_eq!(duration_to_seconds(chrono::Duration::zero()), Some(0.0));
    }

    #[test]
    fn test_millis_conversion() {
        assert_eq!(seconds_to_millis(0.1), 100);
        assert_eq!(seconds_to_millis(2.0), 2000);
        assert_eq!(seconds_to_millis(-1.0), 0);
        assert_eq!(millis_to_seconds(250), 0.25);
    }
}
