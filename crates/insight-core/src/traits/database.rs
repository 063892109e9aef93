// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database trait for the opaque SQL executor.

use async_trait::async_trait;

use crate::error::InsightError;
use crate::traits::adapter::Adapter;
use crate::types::Row;

/// Adapter for the relational database.
///
/// One SQL statement per call. Errors carry the database's textual message
/// verbatim (`InsightError::Database { message, .. }`) because self-healing
/// re-prompts quote it back to the language model.
#[async_trait]
pub trait SqlDatabase: Adapter {
    /// Dry-run validates `sql` via the database's plan-only execution mode,
    /// inside a transaction that is never committed. No rows are
    /// materialized; any syntax/semantic error is returned as
    /// `InsightError::Database`.
    async fn explain(&self, sql: &str) -> Result<(), InsightError>;

    /// Executes `sql` inside a fresh explicit read transaction and
    /// materializes all rows as ordered column→value records.
    async fn query(&self, sql: &str) -> Result<Vec<Row>, InsightError>;
}
