// src/error_recovery.rs
//! Retry with backoff for read-path API operations.
//!
//! Two failure families are retried, each with its own budget: rate limits
//! (wait what Notion asks, or a default) and transient server or transport
//! failures (exponential backoff with jitter). Everything else is returned
//! on the first attempt because waiting cannot fix it.

use crate::constants::{
    RATE_LIMIT_DEFAULT_BACKOFF, RATE_LIMIT_MAX_RETRIES, SERVER_ERROR_INITIAL_BACKOFF,
    SERVER_ERROR_MAX_BACKOFF, SERVER_ERROR_MAX_RETRIES,
};
use crate::error::AppError;
use rand::Rng;
use std::time::Duration;

/// Bounded retry budget for paginated reads.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_rate_limit_retries: u32,
    pub default_rate_limit_backoff: Duration,
    pub max_server_retries: u32,
    pub initial_server_backoff: Duration,
    pub max_server_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rate_limit_retries: RATE_LIMIT_MAX_RETRIES,
            default_rate_limit_backoff: RATE_LIMIT_DEFAULT_BACKOFF,
            max_server_retries: SERVER_ERROR_MAX_RETRIES,
            initial_server_backoff: SERVER_ERROR_INITIAL_BACKOFF,
            max_server_backoff: SERVER_ERROR_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_rate_limit_retries: 0,
            max_server_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before server-error retry number `attempt` (1-based), capped.
    fn server_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let base = self
            .initial_server_backoff
            .saturating_mul(factor)
            .min(self.max_server_backoff);
        // Up to 10% jitter so concurrent fetchers do not retry in lockstep
        let jitter_ms = (base.as_millis() as u64) / 10;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }
}

/// Runs `operation` under `policy`.
///
/// `cursor` identifies the position being fetched and is reported in
/// `RateLimitExceeded` so the caller knows how far pagination got.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    policy: &RetryPolicy,
    cursor: Option<&str>,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut rate_limited = 0u32;
    let mut server_failures = 0u32;

    loop {
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        match error {
            AppError::UpstreamRateLimited { retry_after, .. } => {
                rate_limited += 1;
                if rate_limited > policy.max_rate_limit_retries {
                    log::warn!(
                        "Rate limit retries exhausted at cursor {:?} after {} attempts",
                        cursor,
                        rate_limited
                    );
                    return Err(AppError::RateLimitExceeded {
                        cursor: cursor.map(str::to_string),
                        attempts: rate_limited,
                    });
                }
                let wait = retry_after.unwrap_or(policy.default_rate_limit_backoff);
                log::warn!(
                    "Rate limited (attempt {}/{}), waiting {:?}",
                    rate_limited,
                    policy.max_rate_limit_retries,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
            e if e.is_transient() => {
                server_failures += 1;
                if server_failures > policy.max_server_retries {
                    return Err(e);
                }
                let wait = policy.server_backoff(server_failures);
                log::warn!(
                    "Attempt {} failed ({}), retrying after {:?}",
                    server_failures,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
            e => return Err(e),
        }
    }
}
