// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Insight configuration system.

use insight_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_insight_config() {
    let toml = r#"
[agent]
name = "insight-test"
log_level = "debug"

[llm]
endpoint = "https://example.test/inference"
api_key = "test-key-123"
model = "openai/gpt-4o-mini"
request_timeout_secs = 10

[database]
path = "/tmp/analytics.db"
op_timeout_ms = 2500

[cache]
path = "/tmp/cache.db"
op_timeout_ms = 1500
response_ttl_secs = 600
relevance_ttl_secs = 1200

[limits]
requests_per_minute = 5
requests_per_day = 100
row_cap = 250
history_turns = 3

[server]
bind = "0.0.0.0:9090"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "insight-test");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.llm.endpoint, "https://example.test/inference");
    assert_eq!(config.llm.api_key.as_deref(), Some("test-key-123"));
    assert_eq!(config.llm.model, "openai/gpt-4o-mini");
    assert_eq!(config.llm.request_timeout_secs, 10);
    assert_eq!(config.database.path, "/tmp/analytics.db");
    assert_eq!(config.database.op_timeout_ms, 2500);
    assert_eq!(config.cache.response_ttl_secs, 600);
    assert_eq!(config.cache.relevance_ttl_secs, 1200);
    // Unset TTLs keep the one-hour default.
    assert_eq!(config.cache.sql_ttl_secs, 3600);
    assert_eq!(config.limits.requests_per_minute, 5);
    assert_eq!(config.limits.row_cap, 250);
    assert_eq!(config.limits.history_turns, 3);
    assert_eq!(config.server.bind, "0.0.0.0:9090");
}

/// An empty config is fully defaulted and passes validation.
#[test]
fn empty_config_is_valid() {
    let config = load_and_validate_str("").expect("defaults must validate");
    assert_eq!(config.limits.requests_per_minute, 10);
    assert_eq!(config.limits.requests_per_day, 200);
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn unknown_section_key_is_rejected() {
    let toml = r#"
[llm]
modell = "typo"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Validation failures surface through load_and_validate_str.
#[test]
fn semantic_violations_fail_validation() {
    let toml = r#"
[limits]
requests_per_minute = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("requests_per_minute")));
}

/// A day cap below the minute cap is inconsistent and rejected.
#[test]
fn inconsistent_rate_caps_fail_validation() {
    let toml = r#"
[limits]
requests_per_minute = 500
requests_per_day = 100
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("requests_per_day")));
}
