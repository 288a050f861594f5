//! Configuration, rate limiting and retry for tourscribe.
//!
//! - [`TourscribeConfig`] layers the bundled `tourscribe.toml`, user files and
//!   `TOURSCRIBE_*` environment variables.
//! - [`RateLimiter`] enforces provider tier quotas (GCRA via `governor` plus a
//!   concurrency semaphore) and retries transient failures with exponential
//!   backoff.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod tier;

pub use config::{
    ModelTierConfig, OutputSection, PlannerSection, ProviderConfig, TierConfig, TourSection,
    TourscribeConfig,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use tier::Tier;
