// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Insight query pipeline.

use thiserror::Error;

/// The primary error type used across all Insight adapter traits and core operations.
///
/// These are infrastructure-level failures. Pipeline-level outcomes (rejections,
/// validation failures, rate limiting) live in `insight-pipeline` as a separate
/// typed taxonomy; an `InsightError` only surfaces there after the pipeline has
/// decided how the failing stage degrades.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Cache store errors (connection, serialization, transaction failure).
    #[error("cache error: {source}")]
    Cache {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Database errors. `message` carries the database's own error text verbatim
    /// so it can be fed back into a correction prompt.
    #[error("database error: {message}")]
    Database {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text-generation provider errors (API failure, malformed reply, auth).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl InsightError {
    /// The database's error text, when this is a database error.
    ///
    /// Self-healing re-prompts need the literal message; anything else
    /// is not a database-reported failure and yields `None`.
    pub fn database_message(&self) -> Option<&str> {
        match self {
            InsightError::Database { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct_and_display() {
        let config = InsightError::Config("bad value".into());
        assert!(config.to_string().contains("bad value"));

        let db = InsightError::Database {
            message: "no such column: price".into(),
            source: None,
        };
        assert_eq!(db.database_message(), Some("no such column: price"));
        assert!(db.to_string().contains("no such column"));

        let timeout = InsightError::Timeout {
            duration: std::time::Duration::from_secs(5),
        };
        assert!(timeout.to_string().contains("timed out"));
    }

    #[test]
    fn only_database_errors_carry_a_database_message() {
        let provider = InsightError::Provider {
            message: "503".into(),
            source: None,
        };
        assert_eq!(provider.database_message(), None);
    }
}
