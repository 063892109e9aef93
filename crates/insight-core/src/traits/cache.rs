// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache store trait for the shared key-value cache.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::InsightError;
use crate::traits::adapter::Adapter;

/// Adapter for the shared key-value cache store.
///
/// Counters and cached answers live here, never in process memory, so that
/// multiple workers observe one shared state. The operations are the narrow
/// atomic surface the pipeline needs:
///
/// - `get`/`set` — TTL'd string entries (callers serialize with serde_json).
/// - `incr_with_expiry` — increments a counter and sets its expiry *only if
///   the counter did not already exist*, as one indivisible unit. This is the
///   rate-limiter primitive; a non-atomic incr-then-expire pair could leave a
///   counter that never expires.
/// - `push_capped`/`range` — bounded list entries for conversation history;
///   a push refreshes the entry's TTL.
///
/// Failure policy is the caller's: the pipeline treats cache failures as
/// misses (pass-through), except rate limiting which fails closed.
#[async_trait]
pub trait CacheStore: Adapter {
    /// Returns the live (unexpired) value for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, InsightError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), InsightError>;

    /// Atomically increments the counter at `key` and, if the counter was
    /// absent (or expired), starts its expiry window of `window`. Returns the
    /// post-increment count.
    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<i64, InsightError>;

    /// Appends `value` to the list at `key`, keeping only the most recent
    /// `cap` entries, and refreshes the list's TTL to `ttl`.
    async fn push_capped(
        &self,
        key: &str,
        value: &str,
        cap: usize,
        ttl: Duration,
    ) -> Result<(), InsightError>;

    /// Returns the list at `key`, oldest first. Missing or expired ⇒ empty.
    async fn range(&self, key: &str) -> Result<Vec<String>, InsightError>;
}
