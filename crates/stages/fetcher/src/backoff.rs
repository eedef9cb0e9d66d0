use std::time::Duration;

/// `attempt` 0 has no pre-delay; attempt `n >= 1` sleeps
/// `base_delay * 2^(n-1)` (spec §4.5).
pub fn backoff_delay(attempt: u32, base_delay: Duration) -> Duration {
    if attempt == 0 {
        Duration::ZERO
    } else {
        base_delay * 2u32.pow(attempt - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_zero_has_no_delay() {
        assert_eq!(backoff_delay(0, Duration::from_millis(100)), Duration::ZERO);
    }

    #[test]
    fn delay_doubles_each_attempt() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(1, base), Duration::from_millis(100));
        assert_eq!(backoff_delay(2, base), Duration::from_millis(200));
        assert_eq!(backoff_delay(3, base), Duration::from_millis(400));
    }
}
