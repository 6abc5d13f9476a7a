// src/fetch/retry.rs

use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::{error, warn};

use super::{SheetRange, SheetSource, TabularResponse};
use crate::error::SheetError;

/// Something that can wait. Swapped out in tests to record delays.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        sleep(delay)
    }
}

impl<Z: Sleeper> Sleeper for &Z {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(delay)
    }
}

/// `max_attempts` total tries, waiting `initial_backoff * 2^(n-1)` after the n-th failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Wraps a [`SheetSource`] with sequential retries.
/// Configuration errors fail immediately; only request errors are retried.
#[derive(Debug, Clone)]
pub struct Retrying<S, Z = TokioSleeper> {
    inner: S,
    policy: RetryPolicy,
    sleeper: Z,
}

impl<S: SheetSource> Retrying<S, TokioSleeper> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            sleeper: TokioSleeper,
        }
    }
}

impl<S: SheetSource, Z: Sleeper> Retrying<S, Z> {
    pub fn with_sleeper(inner: S, policy: RetryPolicy, sleeper: Z) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SheetSource, Z: Sleeper> SheetSource for Retrying<S, Z> {
    async fn fetch(&self, range: &SheetRange) -> Result<TabularResponse, SheetError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.inner.fetch(range).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(%range, attempt, delay_ms = delay.as_millis() as u64, error = %e, "Retrying");
                    self.sleeper.sleep(delay).await;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!(%range, attempts = attempt, error = %e, "Exhausted retries");
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    /// Replays a fixed script of results and counts calls.
    pub(crate) struct Scripted {
        script: Mutex<VecDeque<Result<TabularResponse, SheetError>>>,
        pub calls: AtomicUsize,
    }

    impl Scripted {
        pub(crate) fn new(script: Vec<Result<TabularResponse, SheetError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SheetSource for Scripted {
        async fn fetch(&self, _range: &SheetRange) -> Result<TabularResponse, SheetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SheetError::transport("script exhausted")))
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingSleeper {
        pub delays: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
            self.delays.lock().unwrap().push(delay);
            std::future::ready(())
        }
    }

    fn range() -> SheetRange {
        SheetRange::new("Gallery", "A:F")
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn three_transport_failures_surface_the_last_one() {
        let source = Scripted::new(vec![
            Err(SheetError::transport("connection reset")),
            Err(SheetError::transport("connection refused")),
            Err(SheetError::transport("dns lookup failed")),
        ]);
        let sleeper = RecordingSleeper::default();
        let retrying = Retrying::with_sleeper(&source, RetryPolicy::default(), &sleeper);

        let err = retrying.fetch(&range()).await.unwrap_err();

        assert_eq!(err, SheetError::transport("dns lookup failed"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn recovers_after_one_failure() {
        let ok = TabularResponse::new(vec![vec!["date".into()], vec!["2024-01-01".into()]]);
        let source = Scripted::new(vec![Err(SheetError::status(503, "backend")), Ok(ok.clone())]);
        let sleeper = RecordingSleeper::default();
        let retrying = Retrying::with_sleeper(&source, RetryPolicy::default(), &sleeper);

        assert_eq!(retrying.fetch(&range()).await.unwrap(), ok);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn configuration_errors_are_not_retried() {
        let source = Scripted::new(vec![Err(SheetError::config("API key is missing"))]);
        let sleeper = RecordingSleeper::default();
        let retrying = Retrying::with_sleeper(&source, RetryPolicy::default(), &sleeper);

        let err = retrying.fetch(&range()).await.unwrap_err();
        assert!(matches!(err, SheetError::Configuration(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }
}
