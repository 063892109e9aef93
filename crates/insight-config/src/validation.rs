// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive limits and a parseable bind address.

use crate::diagnostic::ConfigError;
use crate::model::InsightConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &InsightConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.llm.endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "llm.endpoint must not be empty".to_string(),
        });
    }

    if config.database.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "database.path must not be empty".to_string(),
        });
    }

    if config.cache.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "cache.path must not be empty".to_string(),
        });
    }

    if config.limits.requests_per_minute <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "limits.requests_per_minute must be positive, got {}",
                config.limits.requests_per_minute
            ),
        });
    }

    if config.limits.requests_per_day <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "limits.requests_per_day must be positive, got {}",
                config.limits.requests_per_day
            ),
        });
    }

    if config.limits.requests_per_day < config.limits.requests_per_minute {
        errors.push(ConfigError::Validation {
            message: format!(
                "limits.requests_per_day ({}) must not be smaller than limits.requests_per_minute ({})",
                config.limits.requests_per_day, config.limits.requests_per_minute
            ),
        });
    }

    if config.limits.row_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.row_cap must be positive".to_string(),
        });
    }

    if config.limits.history_turns == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.history_turns must be positive".to_string(),
        });
    }

    if config.server.bind.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.bind `{}` is not a valid socket address",
                config.server.bind
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = InsightConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_violations_are_collected() {
        let mut config = InsightConfig::default();
        config.llm.endpoint = "  ".into();
        config.limits.requests_per_minute = 0;
        config.limits.row_cap = 0;
        config.server.bind = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        // 0 per-minute also trips the day >= minute check? No: day (200) >= 0.
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn day_cap_below_minute_cap_is_rejected() {
        let mut config = InsightConfig::default();
        config.limits.requests_per_minute = 100;
        config.limits.requests_per_day = 10;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("requests_per_day"));
    }
}
