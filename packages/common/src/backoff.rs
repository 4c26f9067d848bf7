use std::time::Duration;

/// Bounded exponential backoff schedule for polling an external job.
///
/// The delay before the n-th check (1-based) is
/// `min(base_delay * growth_factor^(n-1), max_delay)`, and no more than
/// `max_checks` checks are made before the caller must give up and hand the
/// job handle back.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Delay before the first re-check.
    pub base_delay: Duration,
    /// Multiplicative growth applied after each non-terminal check.
    pub growth_factor: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Hard cap on the number of checks.
    pub max_checks: u32,
}

impl BackoffPolicy {
    /// Delay to sleep before the given 1-based check number.
    pub fn delay_for(&self, check: u32) -> Duration {
        if check == 0 {
            return Duration::ZERO;
        }
        let factor = self.growth_factor.powi((check - 1) as i32);
        let delay_ms = (self.base_delay.as_millis() as f64 * factor).round() as u64;
        Duration::from_millis(delay_ms).min(self.max_delay)
    }
}

/// Run `op` up to `attempts` times with a fixed pause between failures.
///
/// On exhaustion the error from the *last* attempt is returned; earlier
/// errors are discarded. The closure receives the 1-based attempt number.
pub async fn retry_fixed<T, E, F, Fut>(attempts: u32, pause: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= attempts => return Err(err),
            Err(_) => {
                tokio::time::sleep(pause).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn poll_policy() -> BackoffPolicy {
        BackoffPolicy {
            base_delay: Duration::from_millis(1000),
            growth_factor: 1.5,
            max_delay: Duration::from_millis(4000),
            max_checks: 15,
        }
    }

    #[test]
    fn delay_schedule_matches_growth_then_cap() {
        let policy = poll_policy();
        // 1000 * 1.5^(n-1), capped at 4000.
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2250));
        assert_eq!(policy.delay_for(4), Duration::from_millis(3375));
        assert_eq!(policy.delay_for(5), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(15), Duration::from_millis(4000));
    }

    #[test]
    fn delay_schedule_is_non_decreasing() {
        let policy = poll_policy();
        let mut previous = Duration::ZERO;
        for check in 1..=policy.max_checks {
            let delay = policy.delay_for(check);
            assert!(delay >= previous, "delay shrank at check {check}");
            previous = delay;
        }
    }

    #[test]
    fn zero_check_has_no_delay() {
        assert_eq!(poll_policy().delay_for(0), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry_fixed(3, Duration::from_secs(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_recovers_after_transient_failures() {
        let result: Result<&str, String> = retry_fixed(3, Duration::from_secs(1), |attempt| async move {
            if attempt < 3 {
                Err(format!("attempt {attempt} failed"))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_surfaces_the_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_fixed(3, Duration::from_secs(1), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("attempt {attempt} failed")) }
        })
        .await;

        assert_eq!(result, Err("attempt 3 failed".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_treats_zero_attempts_as_one() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = retry_fixed(0, Duration::from_secs(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("nope") }
        })
        .await;

        assert_eq!(result, Err("nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
