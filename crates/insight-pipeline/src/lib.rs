// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query safety and self-healing pipeline for the Insight service.
//!
//! Turns a free-form natural-language question into a validated, read-only
//! SQL statement, executes it, and assembles a tabular response with a chart
//! hint. Stages run strictly in sequence because each one gates the next:
//!
//! Rate Limiter → Intake Classifier → Relevancy Firewall → SQL Generator →
//! Validator → Executor → (on database error) Self-Healing Corrector →
//! response assembly → history append.
//!
//! Every stage returns a typed outcome; nothing here is fatal to the host
//! process.

pub mod chart;
pub mod classifier;
pub mod generator;
pub mod healing;
pub mod history;
pub mod ratelimit;
pub mod relevance;
pub mod validator;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use insight_cache::{keys, CacheExt};
use insight_config::InsightConfig;
use insight_core::{CacheStore, ChatProvider, Row, SqlDatabase};

use crate::chart::{suggest_chart, ChartHint};
use crate::classifier::{IntakeClassifier, Verdict};
use crate::generator::SqlGenerator;
use crate::healing::{RecoveryOutcome, SelfHealer};
use crate::history::{ConversationHistory, ConversationTurn};
use crate::ratelimit::{RateLimitError, RateLimiter, RateScope};
use crate::relevance::RelevancyFirewall;
use crate::validator::{SqlValidator, ValidationError};

/// Tunables for a pipeline instance, usually derived from [`InsightConfig`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub row_cap: u32,
    pub requests_per_minute: i64,
    pub requests_per_day: i64,
    pub history_turns: usize,
    pub response_ttl: Duration,
    pub relevance_ttl: Duration,
    pub sql_ttl: Duration,
    pub error_ttl: Duration,
    pub history_ttl: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            row_cap: config.limits.row_cap,
            requests_per_minute: config.limits.requests_per_minute,
            requests_per_day: config.limits.requests_per_day,
            history_turns: config.limits.history_turns,
            response_ttl: Duration::from_secs(config.cache.response_ttl_secs),
            relevance_ttl: Duration::from_secs(config.cache.relevance_ttl_secs),
            sql_ttl: Duration::from_secs(config.cache.sql_ttl_secs),
            error_ttl: Duration::from_secs(config.cache.error_ttl_secs),
            history_ttl: Duration::from_secs(config.cache.history_ttl_secs),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

/// A successfully answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The statement that was actually executed.
    pub sql: String,
    /// Result rows, in projection order.
    pub rows: Vec<Row>,
    /// Chart suggestion, when the result shape supports one.
    pub chart_hint: Option<ChartHint>,
    /// The conversation this turn belongs to (generated if absent).
    pub conversation_id: String,
    /// Set when the answer was produced by automatic correction.
    pub notice: Option<String>,
}

/// The pipeline's failure taxonomy. Display text is the user-facing message.
#[derive(Debug, Error)]
pub enum QueryFailure {
    /// The intake classifier matched; deterministic, no external calls made.
    #[error("{message}")]
    Rejected { verdict: Verdict, message: String },

    /// The relevancy firewall refused the question.
    #[error("I'm sorry, that question does not seem to be related to the available sales, product, or customer data.")]
    NotRelevant,

    /// The generation service was unavailable or returned nothing usable.
    #[error("The model could not generate a valid query. Please try rephrasing your question.")]
    Generation,

    /// Local, deterministic, security-motivated rejection.
    #[error("{reason}")]
    Validation { reason: String },

    /// The database rejected the statement and self-healing was exhausted;
    /// `explanation` is the diagnosis (or static fallback) text.
    #[error("{explanation}")]
    Execution { sql: String, explanation: String },

    /// The global rate cap for a window is spent.
    #[error("Rate limit exceeded: too many requests this {scope}. Please try again later.")]
    RateLimited { scope: RateScope },

    /// The cache store failed during rate limiting; fail closed.
    #[error("The service is temporarily unable to accept requests. Please try again shortly.")]
    RateLimiterUnavailable,
}

/// Cached form of a successful response. The conversation id is per-request
/// and deliberately not part of the cached value.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedAnswer {
    sql: String,
    rows: Vec<Row>,
    chart_hint: Option<ChartHint>,
    notice: Option<String>,
}

impl CachedAnswer {
    fn of(response: &QueryResponse) -> Self {
        Self {
            sql: response.sql.clone(),
            rows: response.rows.clone(),
            chart_hint: response.chart_hint.clone(),
            notice: response.notice.clone(),
        }
    }

    fn into_response(self, conversation_id: String) -> QueryResponse {
        QueryResponse {
            sql: self.sql,
            rows: self.rows,
            chart_hint: self.chart_hint,
            conversation_id,
            notice: self.notice,
        }
    }
}

/// The assembled pipeline. One instance serves all requests; every stage is
/// request-scoped and shares only the cache store and database handles.
pub struct QueryPipeline {
    classifier: IntakeClassifier,
    limiter: RateLimiter,
    relevance: RelevancyFirewall,
    generator: SqlGenerator,
    validator: SqlValidator,
    healer: SelfHealer,
    history: ConversationHistory,
    provider: Arc<dyn ChatProvider>,
    cache: Arc<dyn CacheStore>,
    db: Arc<dyn SqlDatabase>,
    response_ttl: Duration,
}

impl QueryPipeline {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        cache: Arc<dyn CacheStore>,
        db: Arc<dyn SqlDatabase>,
        settings: PipelineSettings,
    ) -> Self {
        let validator = SqlValidator::new(Arc::clone(&db), settings.row_cap);
        Self {
            classifier: IntakeClassifier::new(),
            limiter: RateLimiter::new(
                Arc::clone(&cache),
                settings.requests_per_minute,
                settings.requests_per_day,
            ),
            relevance: RelevancyFirewall::new(
                Arc::clone(&provider),
                Arc::clone(&cache),
                settings.relevance_ttl,
            ),
            generator: SqlGenerator::new(
                Arc::clone(&provider),
                Arc::clone(&cache),
                settings.sql_ttl,
            ),
            healer: SelfHealer::new(
                Arc::clone(&provider),
                Arc::clone(&cache),
                Arc::clone(&db),
                validator.clone(),
                settings.error_ttl,
            ),
            validator,
            history: ConversationHistory::new(
                Arc::clone(&cache),
                settings.history_ttl,
                settings.history_turns,
            ),
            provider,
            cache,
            db,
            response_ttl: settings.response_ttl,
        }
    }

    /// Handles one question end to end.
    pub async fn handle(
        &self,
        question: &str,
        conversation_id: Option<String>,
    ) -> Result<QueryResponse, QueryFailure> {
        // Rate limiting runs before any other work, and fails closed.
        self.limiter.check().await.map_err(|error| match error {
            RateLimitError::Exceeded(scope) => QueryFailure::RateLimited { scope },
            RateLimitError::Unavailable => QueryFailure::RateLimiterUnavailable,
        })?;

        if let Some(rejection) = self.classifier.classify(question) {
            debug!(verdict = %rejection.verdict, "question rejected by intake classifier");
            return Err(QueryFailure::Rejected {
                verdict: rejection.verdict,
                message: rejection.message,
            });
        }

        let (conversation_id, history) = match conversation_id {
            Some(id) => {
                let history = self.history.recent(&id).await;
                (id, history)
            }
            None => (uuid::Uuid::new_v4().to_string(), Vec::new()),
        };
        let context_free = history.is_empty();

        // Cached full responses apply only to context-free requests.
        if context_free {
            let key = keys::response_key(question);
            match self.cache.get_json::<CachedAnswer>(&key).await {
                Ok(Some(cached)) => {
                    debug!("response served from cache");
                    return Ok(cached.into_response(conversation_id));
                }
                Ok(None) => {}
                Err(error) => warn!(%error, "response cache read failed, treating as miss"),
            }
        }

        if !self.relevance.is_relevant(question).await {
            return Err(QueryFailure::NotRelevant);
        }

        let candidate = self
            .generator
            .generate(question, &history)
            .await
            .ok_or(QueryFailure::Generation)?;

        let (sql, rows, notice) = match self.validator.validate(&candidate).await {
            Ok(sql) => match self.db.query(&sql).await {
                Ok(rows) => (sql, rows, None),
                Err(error) => {
                    let message = error
                        .database_message()
                        .unwrap_or("the database rejected the statement")
                        .to_string();
                    self.recover(question, &sql, &message).await?
                }
            },
            Err(ValidationError::Local(reason)) => {
                info!(%reason, "candidate rejected by validator");
                return Err(QueryFailure::Validation { reason });
            }
            Err(ValidationError::DryRun { sql, message }) => {
                self.recover(question, &sql, &message).await?
            }
        };

        let chart_hint = suggest_chart(&rows);

        self.history
            .append(
                &conversation_id,
                &ConversationTurn {
                    question: question.to_string(),
                    sql: sql.clone(),
                },
            )
            .await;

        let response = QueryResponse {
            sql,
            rows,
            chart_hint,
            conversation_id,
            notice,
        };

        if context_free {
            let key = keys::response_key(question);
            if let Err(error) = self
                .cache
                .set_json(&key, &CachedAnswer::of(&response), self.response_ttl)
                .await
            {
                warn!(%error, "response cache write failed");
            }
        }

        Ok(response)
    }

    /// Routes a database-reported failure through the self-healer and maps
    /// its outcome back into the pipeline's types.
    async fn recover(
        &self,
        question: &str,
        failing_sql: &str,
        error_message: &str,
    ) -> Result<(String, Vec<Row>, Option<String>), QueryFailure> {
        match self.healer.recover(question, failing_sql, error_message).await {
            RecoveryOutcome::Corrected { sql, rows, notice } => Ok((sql, rows, Some(notice))),
            RecoveryOutcome::Explained { explanation } => Err(QueryFailure::Execution {
                sql: failing_sql.to_string(),
                explanation,
            }),
        }
    }

    /// The adapters behind the pipeline, for the health surface.
    pub fn adapters(
        &self,
    ) -> (
        &Arc<dyn ChatProvider>,
        &Arc<dyn CacheStore>,
        &Arc<dyn SqlDatabase>,
    ) {
        (&self.provider, &self.cache, &self.db)
    }
}

#[cfg(test)]
mod testing;
