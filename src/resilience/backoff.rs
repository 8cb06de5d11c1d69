//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` counts failures so far; attempt 0 waits nothing.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Jitter: 0 to 10% of the delay
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay.saturating_add(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_is_immediate() {
        assert_eq!(calculate_backoff(0, 500, 10_000), Duration::ZERO);
    }

    #[test]
    fn test_doubles_until_capped() {
        let b1 = calculate_backoff(1, 500, 10_000).as_millis();
        assert!((500..550).contains(&b1));

        let b3 = calculate_backoff(3, 500, 10_000).as_millis();
        assert!((2000..2200).contains(&b3));

        let capped = calculate_backoff(30, 500, 10_000).as_millis();
        assert!((10_000..11_000).contains(&capped));
    }

    #[test]
    fn test_no_overflow_on_huge_attempts() {
        let d = calculate_backoff(u32::MAX, u64::MAX, u64::MAX);
        assert!(d.as_millis() >= u64::MAX as u128);
    }
}
