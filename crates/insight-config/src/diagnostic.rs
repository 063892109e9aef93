// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic error types for configuration loading and validation.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with miette diagnostic rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("configuration parse error: {message}")]
    #[diagnostic(
        code(insight::config::parse),
        help("check insight.toml and INSIGHT_* environment variables")
    )]
    Parse {
        /// The underlying figment/serde message.
        message: String,
    },

    /// A configuration value failed semantic validation.
    #[error("{message}")]
    #[diagnostic(code(insight::config::validation))]
    Validation {
        /// Human-readable description of the violated constraint.
        message: String,
    },
}

/// Convert a figment extraction error into diagnostic errors.
///
/// Figment aggregates nested errors; each is surfaced individually so the
/// user sees every problem in one run.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render all config errors to stderr, including diagnostic help text.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("error: {error}");
        if let Some(help) = error.help() {
            eprintln!("  help: {help}");
        }
    }
    eprintln!(
        "insight: {} configuration error(s), aborting startup",
        errors.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_carry_the_figment_message() {
        let err: figment::Error = figment::error::Kind::Message("boom".into()).into();
        let errors = figment_to_config_errors(err);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("boom"));
    }
}
