// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability trait definitions for the Insight pipeline.
//!
//! Each external service (text generation, cache store, database) sits
//! behind a narrow trait so the pipeline can be tested with deterministic
//! fakes instead of live services. All traits extend the [`Adapter`] base
//! trait and use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod cache;
pub mod database;
pub mod provider;

pub use adapter::Adapter;
pub use cache::CacheStore;
pub use database::SqlDatabase;
pub use provider::ChatProvider;
