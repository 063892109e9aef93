// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`CacheStore`] trait.
//!
//! A single `cache_entries` table holds scalar entries, counters, and JSON
//! lists, keyed by namespaced key with a millisecond expiry stamp. All
//! access is serialized through tokio-rusqlite's single background thread,
//! which is what makes the increment+expiry unit indivisible: the whole
//! read-modify-write runs as one transaction on one connection.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use insight_core::{Adapter, AdapterType, CacheStore, HealthStatus, InsightError};

/// SQLite-backed shared cache store.
#[derive(Clone)]
pub struct SqliteCache {
    conn: tokio_rusqlite::Connection,
    op_timeout: Duration,
}

/// Milliseconds since the unix epoch.
fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Map a tokio-rusqlite error into the core cache error.
fn map_tr_err(err: tokio_rusqlite::Error) -> InsightError {
    InsightError::Cache {
        source: Box::new(err),
    }
}

impl SqliteCache {
    /// Opens (or creates) the cache store at `path`.
    ///
    /// `op_timeout` bounds every cache operation; callers treat a timeout
    /// like any other cache failure (a miss).
    pub async fn open(path: &str, op_timeout: Duration) -> Result<Self, InsightError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::Error(e)))?;
        let cache = Self { conn, op_timeout };
        cache.init_schema().await?;
        debug!(path, "cache store opened");
        Ok(cache)
    }

    /// Opens an in-memory cache store (tests).
    pub async fn open_in_memory(op_timeout: Duration) -> Result<Self, InsightError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::Error(e)))?;
        let cache = Self { conn, op_timeout };
        cache.init_schema().await?;
        Ok(cache)
    }

    async fn init_schema(&self) -> Result<(), InsightError> {
        self.call_timed(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA busy_timeout = 5000;
                 CREATE TABLE IF NOT EXISTS cache_entries (
                     key        TEXT PRIMARY KEY,
                     value      TEXT NOT NULL,
                     expires_at INTEGER NOT NULL
                 );",
            )?;
            Ok(())
        })
        .await
    }

    /// Runs `f` on the connection's background thread under the op timeout.
    async fn call_timed<T, F>(&self, f: F) -> Result<T, InsightError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.op_timeout, self.conn.call(f)).await {
            Ok(result) => result.map_err(map_tr_err),
            Err(_) => Err(InsightError::Timeout {
                duration: self.op_timeout,
            }),
        }
    }
}

#[async_trait]
impl Adapter for SqliteCache {
    fn name(&self) -> &str {
        "sqlite-cache"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, InsightError> {
        self.call_timed(|conn| {
            conn.execute_batch("SELECT 1;")?;
            Ok(())
        })
        .await?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<String>, InsightError> {
        let key = key.to_string();
        self.call_timed(move |conn| {
            let now = now_ms();
            let mut stmt = conn.prepare(
                "SELECT value FROM cache_entries WHERE key = ?1 AND expires_at > ?2",
            )?;
            let result = stmt.query_row(params![key, now], |row| row.get::<_, String>(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), InsightError> {
        let key = key.to_string();
        let value = value.to_string();
        self.call_timed(move |conn| {
            let now = now_ms();
            // Writes double as the lazy purge point for dead entries.
            conn.execute("DELETE FROM cache_entries WHERE expires_at <= ?1", params![now])?;
            conn.execute(
                "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, expires_at = ?3",
                params![key, value, now + ttl.as_millis() as i64],
            )?;
            Ok(())
        })
        .await
    }

    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<i64, InsightError> {
        let key = key.to_string();
        self.call_timed(move |conn| {
            let now = now_ms();
            let tx = conn.transaction()?;
            // A counter whose window has elapsed is gone, not resumed.
            tx.execute(
                "DELETE FROM cache_entries WHERE key = ?1 AND expires_at <= ?2",
                params![key, now],
            )?;
            // The conflict arm leaves expires_at untouched: the window is
            // anchored to the first increment, not reset on every request.
            tx.execute(
                "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, '1', ?2)
                 ON CONFLICT(key) DO UPDATE SET
                     value = CAST(CAST(value AS INTEGER) + 1 AS TEXT)",
                params![key, now + window.as_millis() as i64],
            )?;
            let count: i64 = tx.query_row(
                "SELECT CAST(value AS INTEGER) FROM cache_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )?;
            tx.commit()?;
            Ok(count)
        })
        .await
    }

    async fn push_capped(
        &self,
        key: &str,
        value: &str,
        cap: usize,
        ttl: Duration,
    ) -> Result<(), InsightError> {
        let key = key.to_string();
        let value = value.to_string();
        self.call_timed(move |conn| {
            let now = now_ms();
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM cache_entries WHERE key = ?1 AND expires_at <= ?2",
                params![key, now],
            )?;
            let existing = tx
                .query_row(
                    "SELECT value FROM cache_entries WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;
            let mut items: Vec<String> = existing
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default();
            items.push(value);
            if items.len() > cap {
                let excess = items.len() - cap;
                items.drain(..excess);
            }
            let serialized = serde_json::to_string(&items)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            // A push refreshes the list's lifetime.
            tx.execute(
                "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, expires_at = ?3",
                params![key, serialized, now + ttl.as_millis() as i64],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, InsightError> {
        let raw = self.get(key).await?;
        Ok(raw
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_cache() -> SqliteCache {
        SqliteCache::open_in_memory(Duration::from_secs(5))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = open_cache().await;
        cache
            .set("query:test", "cached", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("query:test").await.unwrap(),
            Some("cached".to_string())
        );
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let cache = open_cache().await;
        cache
            .set("query:short", "v", Duration::from_millis(40))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("query:short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_refreshes_ttl() {
        let cache = open_cache().await;
        cache
            .set("k", "old", Duration::from_millis(40))
            .await
            .unwrap();
        cache.set("k", "new", Duration::from_secs(60)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn counter_increments_within_window() {
        let cache = open_cache().await;
        let window = Duration::from_secs(60);
        assert_eq!(cache.incr_with_expiry("rate:minute", window).await.unwrap(), 1);
        assert_eq!(cache.incr_with_expiry("rate:minute", window).await.unwrap(), 2);
        assert_eq!(cache.incr_with_expiry("rate:minute", window).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn counter_resets_after_window_elapses() {
        let cache = open_cache().await;
        let window = Duration::from_millis(60);
        assert_eq!(cache.incr_with_expiry("rate:minute", window).await.unwrap(), 1);
        assert_eq!(cache.incr_with_expiry("rate:minute", window).await.unwrap(), 2);
        tokio::time::sleep(Duration::from_millis(100)).await;
        // The window elapsed, so the counter restarts rather than resuming.
        assert_eq!(cache.incr_with_expiry("rate:minute", window).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn increments_do_not_extend_the_window() {
        let cache = open_cache().await;
        let window = Duration::from_millis(100);
        cache.incr_with_expiry("rate:day", window).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        // This increment lands inside the window and must not push its end out.
        cache.incr_with_expiry("rate:day", window).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.incr_with_expiry("rate:day", window).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_push_keeps_most_recent_entries() {
        let cache = open_cache().await;
        let ttl = Duration::from_secs(60);
        for i in 0..7 {
            cache
                .push_capped("history:c1", &format!("turn-{i}"), 5, ttl)
                .await
                .unwrap();
        }
        let items = cache.range("history:c1").await.unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items.first().map(String::as_str), Some("turn-2"));
        assert_eq!(items.last().map(String::as_str), Some("turn-6"));
    }

    #[tokio::test]
    async fn missing_list_reads_as_empty() {
        let cache = open_cache().await;
        assert!(cache.range("history:absent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let cache = open_cache().await;
        assert_eq!(cache.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
