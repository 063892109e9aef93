// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-schema analytics database adapter for the Insight query pipeline.
//!
//! Provides the SQLite-backed [`SqlDatabase`] implementation (dry-run
//! validation and read-transaction execution), the fixed three-table schema,
//! and demo data seeding.
//!
//! [`SqlDatabase`]: insight_core::SqlDatabase

pub mod database;
pub mod schema;
pub mod seed;

pub use database::Database;
pub use seed::{seed, SeedReport};
