// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters and a full-pipeline test harness for Insight.
//!
//! Everything external to the pipeline (the text-generation service) is
//! replaced with a scriptable mock; the cache store and analytics database
//! run on temp SQLite files so their real transaction and TTL behavior is
//! exercised.

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::MockProvider;
