// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Insight query pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Insight configuration.
///
/// Loaded from TOML files, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InsightConfig {
    /// Service identity settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Text-generation provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Analytics database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Shared cache store settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Rate limiting and result caps.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "insight".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Text-generation provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible inference endpoint.
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key. `None` requires the `INSIGHT_LLM_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_llm_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: None,
            model: default_llm_model(),
            request_timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_llm_endpoint() -> String {
    "https://models.github.ai/inference".to_string()
}

fn default_llm_model() -> String {
    "openai/gpt-4o".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

/// Analytics database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Per-operation timeout in milliseconds (dry-run and execution).
    #[serde(default = "default_db_timeout_ms")]
    pub op_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            op_timeout_ms: default_db_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    "insight.db".to_string()
}

fn default_db_timeout_ms() -> u64 {
    10_000
}

/// Shared cache store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Path to the cache store's SQLite file. Shared across workers.
    #[serde(default = "default_cache_path")]
    pub path: String,

    /// Per-operation timeout in milliseconds. A timed-out cache op is
    /// treated as a miss by the pipeline.
    #[serde(default = "default_cache_timeout_ms")]
    pub op_timeout_ms: u64,

    /// TTL for cached full responses (`query:` entries), seconds.
    #[serde(default = "default_hour_secs")]
    pub response_ttl_secs: u64,

    /// TTL for cached relevancy decisions (`relevance:` entries), seconds.
    #[serde(default = "default_hour_secs")]
    pub relevance_ttl_secs: u64,

    /// TTL for cached generated SQL (`sql:` entries), seconds.
    #[serde(default = "default_hour_secs")]
    pub sql_ttl_secs: u64,

    /// TTL for cached error diagnoses (`error:` entries), seconds.
    #[serde(default = "default_hour_secs")]
    pub error_ttl_secs: u64,

    /// TTL for conversation history (`history:` entries), seconds.
    /// Refreshed on every append.
    #[serde(default = "default_hour_secs")]
    pub history_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            op_timeout_ms: default_cache_timeout_ms(),
            response_ttl_secs: default_hour_secs(),
            relevance_ttl_secs: default_hour_secs(),
            sql_ttl_secs: default_hour_secs(),
            error_ttl_secs: default_hour_secs(),
            history_ttl_secs: default_hour_secs(),
        }
    }
}

fn default_cache_path() -> String {
    "insight-cache.db".to_string()
}

fn default_cache_timeout_ms() -> u64 {
    5_000
}

fn default_hour_secs() -> u64 {
    3_600
}

/// Rate limiting and result caps.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Global admitted-request cap per minute.
    #[serde(default = "default_per_minute")]
    pub requests_per_minute: i64,

    /// Global admitted-request cap per day.
    #[serde(default = "default_per_day")]
    pub requests_per_day: i64,

    /// Default row cap appended to statements without a LIMIT clause.
    #[serde(default = "default_row_cap")]
    pub row_cap: u32,

    /// Number of recent (question, SQL) pairs kept per conversation.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_per_minute(),
            requests_per_day: default_per_day(),
            row_cap: default_row_cap(),
            history_turns: default_history_turns(),
        }
    }
}

fn default_per_minute() -> i64 {
    10
}

fn default_per_day() -> i64 {
    200
}

fn default_row_cap() -> u32 {
    1_000
}

fn default_history_turns() -> usize {
    5
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the gateway listener.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
