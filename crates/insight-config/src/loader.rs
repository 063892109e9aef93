// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./insight.toml` > `~/.config/insight/insight.toml`
//! > `/etc/insight/insight.toml` with environment variable overrides via the
//! `INSIGHT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::InsightConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/insight/insight.toml` (system-wide)
/// 3. `~/.config/insight/insight.toml` (user XDG config)
/// 4. `./insight.toml` (local directory)
/// 5. `INSIGHT_*` environment variables
pub fn load_config() -> Result<InsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InsightConfig::default()))
        .merge(Toml::file("/etc/insight/insight.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("insight/insight.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("insight.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<InsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InsightConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<InsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InsightConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `INSIGHT_LLM_API_KEY` must map to
/// `llm.api_key`, not `llm.api.key`.
fn env_provider() -> Env {
    Env::prefixed("INSIGHT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: INSIGHT_LLM_API_KEY -> "llm_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("llm_", "llm.", 1)
            .replacen("database_", "database.", 1)
            .replacen("cache_", "cache.", 1)
            .replacen("limits_", "limits.", 1)
            .replacen("server_", "server.", 1);
        mapped.into()
    })
}
