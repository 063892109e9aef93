// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all external-service adapters implement.

use async_trait::async_trait;

use crate::error::InsightError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Insight service adapters.
///
/// Every adapter (provider, cache, database) implements this trait, which
/// provides identity and health check capabilities for the health surface.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the type of adapter (provider, cache, database).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, InsightError>;
}
