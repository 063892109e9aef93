// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed get/set helpers over the string-valued [`CacheStore`].
//!
//! Values are serialized with serde_json on write and deserialized back into
//! the same semantic type on read. An entry that fails to deserialize is
//! treated as a miss, not an error: a stale or foreign entry must never fail
//! a request.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use insight_core::{CacheStore, InsightError};

/// JSON (de)serialization helpers available on every [`CacheStore`].
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Reads and deserializes the entry at `key`. Undeserializable ⇒ miss.
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>, InsightError>
    where
        T: DeserializeOwned + Send,
    {
        let raw = self.get(key).await?;
        match raw {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(error) => {
                    warn!(key, %error, "dropping undeserializable cache entry");
                    Ok(None)
                }
            },
        }
    }

    /// Serializes and stores `value` under `key` with the given TTL.
    async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), InsightError>
    where
        T: Serialize + Sync,
    {
        let serialized = serde_json::to_string(value).map_err(|e| InsightError::Cache {
            source: Box::new(e),
        })?;
        self.set(key, &serialized, ttl).await
    }
}

impl<C: CacheStore + ?Sized> CacheExt for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteCache;

    #[tokio::test]
    async fn json_round_trip_preserves_the_value() {
        let cache = SqliteCache::open_in_memory(Duration::from_secs(5))
            .await
            .unwrap();
        cache
            .set_json("relevance:q", &true, Duration::from_secs(60))
            .await
            .unwrap();
        let decision: Option<bool> = cache.get_json("relevance:q").await.unwrap();
        assert_eq!(decision, Some(true));
    }

    #[tokio::test]
    async fn undeserializable_entry_reads_as_miss() {
        let cache = SqliteCache::open_in_memory(Duration::from_secs(5))
            .await
            .unwrap();
        cache
            .set("relevance:q", "not-json{", Duration::from_secs(60))
            .await
            .unwrap();
        let decision: Option<bool> = cache.get_json("relevance:q").await.unwrap();
        assert_eq!(decision, None);
    }
}
