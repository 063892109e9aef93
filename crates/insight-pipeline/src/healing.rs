// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Self-healing correction for database-reported query errors.
//!
//! Runs only when the database itself rejected a statement (at dry-run or
//! execution time), never for local validation rejections. The sequence is
//! an explicit linear walk, not nested error handlers:
//!
//! Correct → Re-validate → Re-execute → (on any failure) Diagnose → Static
//!
//! At most one corrected statement is generated and at most one re-execution
//! attempted, regardless of how correction fails. Nothing in this module can
//! return an error past the pipeline boundary: the worst case is the static
//! fallback message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use insight_cache::{keys, CacheExt};
use insight_core::{CacheStore, ChatProvider, ChatRequest, Row, SqlDatabase};
use insight_db::schema;

use crate::validator::SqlValidator;

/// Small tolerance for rephrasing; zero would just reproduce the failure.
const CORRECTION_TEMPERATURE: f32 = 0.2;

/// Diagnosis is prose for a human; give the model room to phrase it.
const DIAGNOSIS_TEMPERATURE: f32 = 0.7;

const GENERATOR_ROLE: &str = "You are an expert SQL query generator.";
const ASSISTANT_ROLE: &str = "You are a helpful database assistant.";

const STATIC_FALLBACK: &str =
    "I couldn't run that query. It might be asking for information that isn't in the database.";

/// User-facing notice attached to responses that were auto-corrected.
const CORRECTION_NOTICE: &str =
    "The generated query failed and was automatically corrected before producing this answer.";

/// Outcome of a recovery attempt.
#[derive(Debug)]
pub enum RecoveryOutcome {
    /// The corrected statement validated and executed; results attached.
    Corrected {
        sql: String,
        rows: Vec<Row>,
        notice: String,
    },
    /// Correction was exhausted; a user-facing explanation of the failure.
    Explained { explanation: String },
}

/// One-shot corrector with a diagnosis fallback.
pub struct SelfHealer {
    provider: Arc<dyn ChatProvider>,
    cache: Arc<dyn CacheStore>,
    db: Arc<dyn SqlDatabase>,
    validator: SqlValidator,
    error_ttl: Duration,
}

impl SelfHealer {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        cache: Arc<dyn CacheStore>,
        db: Arc<dyn SqlDatabase>,
        validator: SqlValidator,
        error_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            db,
            validator,
            error_ttl,
        }
    }

    /// Attempts exactly one correct-validate-execute cycle for a statement
    /// the database rejected, falling back to a diagnosis explanation.
    pub async fn recover(
        &self,
        question: &str,
        failing_sql: &str,
        error_message: &str,
    ) -> RecoveryOutcome {
        info!(error = error_message, "attempting automatic correction");

        let corrected = match self.correct(question, failing_sql, error_message).await {
            Some(corrected) => corrected,
            None => {
                return self.diagnose(question, failing_sql, error_message).await;
            }
        };

        let validated = match self.validator.validate(&corrected).await {
            Ok(validated) => validated,
            Err(error) => {
                warn!(%error, "corrected statement failed validation");
                return self.diagnose(question, failing_sql, error_message).await;
            }
        };

        match self.db.query(&validated).await {
            Ok(rows) => {
                info!("automatic correction succeeded");
                RecoveryOutcome::Corrected {
                    sql: validated,
                    rows,
                    notice: CORRECTION_NOTICE.to_string(),
                }
            }
            Err(error) => {
                warn!(%error, "corrected statement failed execution");
                self.diagnose(question, failing_sql, error_message).await
            }
        }
    }

    /// Asks the model for one corrected statement. `None` on provider failure.
    async fn correct(
        &self,
        question: &str,
        failing_sql: &str,
        error_message: &str,
    ) -> Option<String> {
        let prompt = format!(
            "A user asked: \"{question}\"\n\
             This SQL failed: \"{failing_sql}\"\n\
             The database returned this error: \"{error_message}\"\n\n\
             Reply with exactly one corrected SQLite SELECT statement for the schema below, \
             and nothing else.\n\nSchema:\n{}",
            schema::PROMPT_SCHEMA,
        );
        let request = ChatRequest::deterministic(GENERATOR_ROLE, prompt)
            .with_temperature(CORRECTION_TEMPERATURE);
        match self.provider.complete(request).await {
            Ok(response) => Some(response.content),
            Err(error) => {
                warn!(%error, "correction request failed");
                None
            }
        }
    }

    /// Explains the failure in user-facing language. Cached per
    /// (question, SQL); degrades to the static fallback.
    async fn diagnose(
        &self,
        question: &str,
        failing_sql: &str,
        error_message: &str,
    ) -> RecoveryOutcome {
        let key = keys::error_key(question, failing_sql);

        match self.cache.get_json::<String>(&key).await {
            Ok(Some(cached)) => {
                return RecoveryOutcome::Explained {
                    explanation: cached,
                };
            }
            Ok(None) => {}
            Err(error) => warn!(%error, "diagnosis cache read failed, treating as miss"),
        }

        let prompt = format!(
            "A user asked: \"{question}\"\n\
             I generated this SQL: \"{failing_sql}\"\n\
             The database returned this error: \"{error_message}\"\n\n\
             Based on the schema below, explain the problem to the user in a simple, friendly \
             way and suggest a valid alternative question.\n\nSchema:\n{}",
            schema::PROMPT_SCHEMA,
        );
        let request = ChatRequest::deterministic(ASSISTANT_ROLE, prompt)
            .with_temperature(DIAGNOSIS_TEMPERATURE);

        let explanation = match self.provider.complete(request).await {
            Ok(response) => {
                if let Err(error) = self
                    .cache
                    .set_json(&key, &response.content, self.error_ttl)
                    .await
                {
                    warn!(%error, "diagnosis cache write failed");
                }
                response.content
            }
            Err(error) => {
                warn!(%error, "diagnosis request failed, using static fallback");
                STATIC_FALLBACK.to_string()
            }
        };

        RecoveryOutcome::Explained { explanation }
    }
}
