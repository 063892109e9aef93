// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Insight pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A single result row: column name → scalar value, in projection order.
///
/// `serde_json::Map` is built with `preserve_order`, so iteration yields
/// columns in the order the statement projected them.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a capability trait.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Cache,
    Database,
}

/// A request to a text-generation provider.
///
/// One system/user pair per call; the pipeline never sends multi-turn
/// transcripts to the provider (history is rendered into the user prompt).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System role text framing the assistant ("You are a relevancy checker.").
    pub system: String,
    /// User role text.
    pub user: String,
    /// Model identifier override; `None` uses the provider's default.
    pub model: Option<String>,
    /// Sampling temperature. 0.0 for relevancy/generation, nonzero for
    /// correction and diagnosis.
    pub temperature: f32,
    /// Output token cap; `None` leaves it to the provider.
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// A deterministic (temperature 0.0) request with no token cap.
    pub fn deterministic(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            model: None,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Caps the reply at `max_tokens` output tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Overrides the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A response from a text-generation provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// The generated text.
    pub content: String,
    /// The model that produced it.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn adapter_type_round_trips_through_string() {
        for variant in [AdapterType::Provider, AdapterType::Cache, AdapterType::Database] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn chat_request_builders() {
        let req = ChatRequest::deterministic("sys", "user")
            .with_max_tokens(5)
            .with_temperature(0.2);
        assert_eq!(req.system, "sys");
        assert_eq!(req.max_tokens, Some(5));
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn rows_preserve_column_order() {
        let mut row = Row::new();
        row.insert("month".into(), serde_json::json!("2023-01"));
        row.insert("total".into(), serde_json::json!(120));
        let columns: Vec<&String> = row.keys().collect();
        assert_eq!(columns, ["month", "total"]);
    }
}
