// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache key namespacing and question normalization.
//!
//! Raw question text is never used as a cache key: it is always normalized
//! (trimmed, case-folded) first, so `" Total Revenue "` and `"total revenue"`
//! resolve to the same entry.

/// Normalize a question for use in a cache key.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Key for a cached full response to a context-free question.
pub fn response_key(question: &str) -> String {
    format!("query:{}", normalize(question))
}

/// Key for a cached relevancy decision.
pub fn relevance_key(question: &str) -> String {
    format!("relevance:{}", normalize(question))
}

/// Key for cached generated SQL (context-free questions only).
pub fn sql_key(question: &str) -> String {
    format!("sql:{}", normalize(question))
}

/// Key for a cached error diagnosis. Scoped to both the question and the
/// failing SQL, since the same question can fail differently over time.
pub fn error_key(question: &str, sql: &str) -> String {
    format!("error:{}:{}", normalize(question), sql)
}

/// Key for a conversation's bounded history list.
pub fn history_key(conversation_id: &str) -> String {
    format!("history:{conversation_id}")
}

/// Key for the global per-minute rate counter.
pub const RATE_MINUTE_KEY: &str = "rate:minute";

/// Key for the global per-day rate counter.
pub const RATE_DAY_KEY: &str = "rate:day";
