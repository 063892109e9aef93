// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema- and history-aware SQL generation.
//!
//! Builds a prompt embedding the literal table schema, up to five prior
//! (question, SQL) pairs when the conversation has context, and an
//! instruction to emit exactly one SELECT statement. Generation runs at
//! temperature 0.0: determinism is worth more than creativity here.
//!
//! Raw results are cached under `sql:<normalized question>` ONLY for
//! context-free requests. A history-bearing request is inherently
//! context-dependent and must not poison the context-free cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use insight_cache::keys;
use insight_core::{CacheStore, ChatProvider, ChatRequest};
use insight_db::schema;

use crate::history::ConversationTurn;

const SYSTEM_ROLE: &str = "You are an expert SQL query generator.";

/// Language-model SQL generator.
pub struct SqlGenerator {
    provider: Arc<dyn ChatProvider>,
    cache: Arc<dyn CacheStore>,
    sql_ttl: Duration,
}

impl SqlGenerator {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        cache: Arc<dyn CacheStore>,
        sql_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            sql_ttl,
        }
    }

    /// Builds the full generation prompt: schema + optional history + question.
    pub fn build_prompt(question: &str, history: &[ConversationTurn]) -> String {
        let mut prompt = format!("Given the SQLite schema:\n{}\n\n", schema::PROMPT_SCHEMA);
        if !history.is_empty() {
            prompt.push_str("Recent conversation, for resolving follow-up questions:\n");
            for turn in history {
                prompt.push_str(&format!("Q: {}\nSQL: {}\n", turn.question, turn.sql));
            }
            prompt.push('\n');
        }
        prompt.push_str(&format!(
            "Generate a single, valid SQLite SELECT query for the question: \"{question}\"\n\n\
             Only output the SQL query itself, with no additional text or formatting.",
        ));
        prompt
    }

    /// Generates candidate SQL for `question`.
    ///
    /// Returns `None` on provider failure; the caller surfaces that as a
    /// retryable condition, not a crash. Cache failures degrade to a miss.
    pub async fn generate(
        &self,
        question: &str,
        history: &[ConversationTurn],
    ) -> Option<String> {
        let context_free = history.is_empty();
        let key = keys::sql_key(question);

        if context_free {
            match self.cache.get(&key).await {
                Ok(Some(cached)) => {
                    debug!("generated SQL served from cache");
                    return Some(cached);
                }
                Ok(None) => {}
                Err(error) => warn!(%error, "sql cache read failed, treating as miss"),
            }
        }

        let prompt = Self::build_prompt(question, history);
        let request = ChatRequest::deterministic(SYSTEM_ROLE, prompt);

        match self.provider.complete(request).await {
            Ok(response) => {
                if context_free {
                    if let Err(error) =
                        self.cache.set(&key, &response.content, self.sql_ttl).await
                    {
                        warn!(%error, "sql cache write failed");
                    }
                }
                Some(response.content)
            }
            Err(error) => {
                warn!(%error, "SQL generation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_schema_and_question() {
        let prompt = SqlGenerator::build_prompt("total revenue per month", &[]);
        assert!(prompt.contains("Table: sales"));
        assert!(prompt.contains("total revenue per month"));
        assert!(!prompt.contains("Recent conversation"));
    }

    #[test]
    fn prompt_renders_history_pairs_in_order() {
        let history = vec![
            ConversationTurn {
                question: "revenue by month?".into(),
                sql: "SELECT 1".into(),
            },
            ConversationTurn {
                question: "just 2023?".into(),
                sql: "SELECT 2".into(),
            },
        ];
        let prompt = SqlGenerator::build_prompt("and by category?", &history);
        let first = prompt.find("revenue by month?").unwrap();
        let second = prompt.find("just 2023?").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Recent conversation"));
    }
}
