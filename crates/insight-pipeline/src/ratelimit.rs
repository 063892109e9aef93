// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Global abuse-rate limiting.
//!
//! Two process-wide counters (per-minute, per-day) live in the shared cache
//! store so every worker observes one count. Each check increments first and
//! compares after, via the store's atomic increment-with-conditional-expiry
//! primitive: the window is anchored to the first request in it and is never
//! extended by later ones.
//!
//! Policy on store failure is fail closed: with the limiter blind, requests
//! are rejected rather than waved through.

use std::sync::Arc;
use std::time::Duration;

use strum::Display;
use thiserror::Error;
use tracing::warn;

use insight_cache::keys;
use insight_core::CacheStore;

const MINUTE_WINDOW: Duration = Duration::from_secs(60);
const DAY_WINDOW: Duration = Duration::from_secs(86_400);

/// Which window a request was rejected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RateScope {
    Minute,
    Day,
}

/// Rate-limit check outcome when the request is not admitted.
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// The global cap for this window is spent.
    #[error("rate limit exceeded for this {0}")]
    Exceeded(RateScope),

    /// The cache store could not be reached; fail closed.
    #[error("rate limiter unavailable")]
    Unavailable,
}

/// Shared-store rate limiter.
pub struct RateLimiter {
    cache: Arc<dyn CacheStore>,
    per_minute: i64,
    per_day: i64,
}

impl RateLimiter {
    pub fn new(cache: Arc<dyn CacheStore>, per_minute: i64, per_day: i64) -> Self {
        Self {
            cache,
            per_minute,
            per_day,
        }
    }

    /// Admits or rejects the current request. Called before any other work.
    pub async fn check(&self) -> Result<(), RateLimitError> {
        let minute = self
            .cache
            .incr_with_expiry(keys::RATE_MINUTE_KEY, MINUTE_WINDOW)
            .await
            .map_err(|error| {
                warn!(%error, "rate counter unavailable, failing closed");
                RateLimitError::Unavailable
            })?;
        if minute > self.per_minute {
            return Err(RateLimitError::Exceeded(RateScope::Minute));
        }

        let day = self
            .cache
            .incr_with_expiry(keys::RATE_DAY_KEY, DAY_WINDOW)
            .await
            .map_err(|error| {
                warn!(%error, "rate counter unavailable, failing closed");
                RateLimitError::Unavailable
            })?;
        if day > self.per_day {
            return Err(RateLimitError::Exceeded(RateScope::Day));
        }

        Ok(())
    }
}
