//! Time utilities for round scheduling

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// One countdown tick of the round timer
pub const ROUND_TICK: Duration = Duration::from_secs(1);

/// Convert clip seconds into a sleep duration; negative or NaN becomes zero
pub fn secs(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    }
}

/// Round to one decimal place
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_never_goes_negative() {
        assert_eq!(secs(-0.5), Duration::ZERO);
        assert_eq!(secs(f64::NAN), Duration::ZERO);
        assert_eq!(secs(1.5), Duration::from_millis(1500));
    }

    #[test]
    fn round_tenth_drops_float_noise() {
        assert_eq!(round_tenth(50.0 * 1.1), 55.0);
        assert_eq!(round_tenth(38.46), 38.5);
        assert_eq!(round_tenth(12.04), 12.0);
    }
}
