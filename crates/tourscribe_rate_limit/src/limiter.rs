//! Rate limiter built on governor and a Tokio semaphore.
//!
//! GCRA limiters cover requests per minute, tokens per minute and requests
//! per day; the semaphore caps concurrent calls. [`RateLimiter::execute`]
//! adds retry with exponential backoff for transient failures.

use crate::Tier;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tourscribe_error::RetryableError;
use tracing::{debug, warn};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Rate limiter that owns a tier value and gates access to it.
///
/// # Example
///
/// ```
/// use tourscribe_rate_limit::{RateLimiter, TierConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = RateLimiter::new(TierConfig::unlimited());
/// let guard = limiter.acquire(1000).await;
/// assert_eq!(limiter.inner().name, "Unlimited");
/// drop(guard);
/// # }
/// ```
#[derive(Clone)]
pub struct RateLimiter<T: Tier> {
    inner: T,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    tpm_limiter: Option<(Arc<DirectRateLimiter>, NonZeroU32)>,
    rpd_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl<T: Tier> RateLimiter<T> {
    /// Create a limiter enforcing every non-`None` limit of `tier`.
    pub fn new(tier: T) -> Self {
        let rpm_limiter = tier
            .rpm()
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))));

        // Governor cells are u32; larger budgets are capped.
        let tpm_limiter = tier
            .tpm()
            .and_then(|tpm| NonZeroU32::new(tpm.min(u32::MAX as u64) as u32))
            .map(|n| (Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))), n));

        let rpd_limiter = tier.rpd().and_then(NonZeroU32::new).and_then(|n| {
            Quota::with_period(Duration::from_secs(SECONDS_PER_DAY) / n.get())
                .map(|quota| Arc::new(GovernorRateLimiter::direct(quota.allow_burst(n))))
        });

        let max_concurrent = tier.max_concurrent().unwrap_or(u32::MAX);
        let concurrent_semaphore = Arc::new(Semaphore::new(max_concurrent as usize));

        Self {
            inner: tier,
            rpm_limiter,
            tpm_limiter,
            rpd_limiter,
            concurrent_semaphore,
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        }
    }

    /// Create a limiter with retry overrides.
    ///
    /// * `no_retry` - attempt each operation once
    /// * `max_retries` - override the number of retries
    /// * `retry_backoff_ms` - override the initial backoff
    pub fn new_with_retry(
        tier: T,
        no_retry: bool,
        max_retries: Option<usize>,
        retry_backoff_ms: Option<u64>,
    ) -> Self {
        let mut limiter = Self::new(tier);
        limiter.no_retry = no_retry;
        limiter.max_retries = max_retries;
        limiter.retry_backoff_ms = retry_backoff_ms;
        limiter
    }

    /// The wrapped tier value.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn token_cells(&self, estimated_tokens: u64) -> Option<(&DirectRateLimiter, NonZeroU32)> {
        self.tpm_limiter.as_ref().map(|(limiter, capacity)| {
            let tokens = estimated_tokens.clamp(1, capacity.get() as u64) as u32;
            (limiter.as_ref(), NonZeroU32::new(tokens).unwrap_or(NonZeroU32::MIN))
        })
    }

    /// Wait until every limit admits one request of `estimated_tokens`.
    ///
    /// The returned guard holds a concurrency slot until dropped.
    pub async fn acquire(&self, estimated_tokens: u64) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        if let Some((limiter, cells)) = self.token_cells(estimated_tokens) {
            if let Err(e) = limiter.until_n_ready(cells).await {
                warn!(error = %e, "Token estimate exceeds TPM burst capacity");
            }
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.until_ready().await;
        }

        // Concurrency last, so no slot is held while waiting on quotas
        let permit = self.concurrent_semaphore.clone().acquire_owned().await.ok();
        RateLimiterGuard { _permit: permit }
    }

    /// Acquire without waiting; `None` if any limit would block.
    pub fn try_acquire(&self, estimated_tokens: u64) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        if let Some((limiter, cells)) = self.token_cells(estimated_tokens) {
            limiter.check_n(cells).ok()?.ok()?;
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.check().ok()?;
        }

        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;
        Some(RateLimiterGuard {
            _permit: Some(permit),
        })
    }

    /// Run `operation` under rate limiting with retry of transient failures.
    ///
    /// The first failure picks the backoff schedule through
    /// [`RetryableError::retry_strategy_params`]; configured overrides win.
    /// Permanent failures return immediately.
    pub async fn execute<F, Fut, R, E>(&self, estimated_tokens: u64, operation: F) -> Result<R, E>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
        E: RetryableError + std::fmt::Display,
    {
        let first = {
            let _guard = self.acquire(estimated_tokens).await;
            operation().await
        };

        let err = match first {
            Ok(value) => return Ok(value),
            Err(e) if self.no_retry || !e.is_retryable() => return Err(e),
            Err(e) => e,
        };

        let (initial_ms, retries, max_delay_secs) = err.retry_strategy_params();
        let initial_ms = self.retry_backoff_ms.unwrap_or(initial_ms);
        let retries = self.max_retries.unwrap_or(retries);
        if retries == 0 {
            return Err(err);
        }

        warn!(
            error = %err,
            initial_ms,
            retries,
            max_delay_secs,
            "Transient error, retrying with backoff"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(retries);

        Retry::spawn(strategy, || async {
            let _guard = self.acquire(estimated_tokens).await;
            match operation().await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() => {
                    debug!(error = %e, "Transient error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }
}

/// Releases the concurrency slot when dropped.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
