//! Exponential-backoff retry for transactions that hit transient
//! persistence conflicts (serialization failures, deadlocks, busy SQLite
//! databases, exhausted connection pools).
//!
//! Only errors for which [`AppError::is_transient`] holds are retried.
//! Business-rule failures propagate on the first attempt.

use crate::config::TransactionConfig;
use crate::error::{AppError, AppResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    pub initial_delay: Duration,
    /// Cap for the exponential backoff
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl From<&TransactionConfig> for RetryPolicy {
    fn from(cfg: &TransactionConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            initial_delay: Duration::from_millis(cfg.initial_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// delay = initial_delay * multiplier^attempt, capped at max_delay
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return self.initial_delay.min(self.max_delay);
        }
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails with a non-transient error,
    /// or runs out of retries. Exhaustion surfaces as
    /// [`AppError::OperationFailed`].
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        log::info!("{operation_name} committed after {attempt} retries");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() => {
                    if attempt >= self.max_retries {
                        log::error!(
                            "{operation_name} failed after {} attempts: {err}",
                            attempt + 1
                        );
                        return Err(AppError::OperationFailed(format!(
                            "{operation_name} could not be completed, please try again"
                        )));
                    }
                    let delay = with_jitter(self.delay_for_attempt(attempt));
                    log::warn!(
                        "{operation_name} hit a transient conflict (attempt {}), retrying in {}ms: {err}",
                        attempt + 1,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Random delay in `[delay / 2, delay]`, so transactions that collided do
/// not retry in lockstep.
fn with_jitter(delay: Duration) -> Duration {
    let half = delay / 2;
    let spread = (delay - half).as_micros() as u64;
    if spread == 0 {
        return delay;
    }
    half + Duration::from_micros(rand::thread_rng().gen_range(0..=spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_delay_calculation() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
    }

    #[test]
    fn test_jitter_stays_within_half_and_full_delay() {
        let delay = Duration::from_millis(80);
        for _ in 0..200 {
            let d = with_jitter(delay);
            assert!(d >= Duration::from_millis(40) && d <= delay, "{d:?}");
        }
        assert_eq!(with_jitter(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(2),
            multiplier: 10.0,
        };
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let result = fast_policy(3)
            .run("test_op", || {
                let c = Arc::clone(&c);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(AppError::TransientConflict("serialization failure".into()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_operation_failed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let result: AppResult<()> = fast_policy(2)
            .run("test_op", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::TransientConflict("deadlock".into()))
                }
            })
            .await;
        assert!(matches!(result, Err(AppError::OperationFailed(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_business_errors_are_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let result: AppResult<()> = fast_policy(5)
            .run("test_op", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::CampaignNotActive(1))
                }
            })
            .await;
        assert!(matches!(result, Err(AppError::CampaignNotActive(1))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
