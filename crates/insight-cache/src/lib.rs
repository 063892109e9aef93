// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared key-value cache store for the Insight query pipeline.
//!
//! Provides a SQLite-backed [`CacheStore`] implementation with TTL'd entries,
//! an atomic increment-with-conditional-expiry primitive for rate counters,
//! bounded JSON lists for conversation history, and the namespaced key
//! helpers every pipeline stage uses.
//!
//! [`CacheStore`]: insight_core::CacheStore

pub mod keys;
pub mod store;
pub mod typed;

pub use store::SqliteCache;
pub use typed::CacheExt;
