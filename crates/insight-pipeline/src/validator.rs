// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-layer SQL validation and sanitization.
//!
//! Candidate SQL from the generator is never executed directly. It first
//! passes through [`sanitize`] (pure, deterministic, no I/O) and then a
//! dry-run plan check against the live database. The two failure kinds are
//! distinct on purpose: a local rejection is a security decision and is
//! final, while a database-reported dry-run error is the same class of
//! failure as a runtime execution error and is eligible for self-healing.
//!
//! Sanitization is idempotent: re-validating an already-validated statement
//! returns it unchanged.

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use insight_core::SqlDatabase;

/// Keywords that must not appear anywhere in a candidate statement, matched
/// on word boundaries so column names like `created_at` don't false-trip.
static DENYLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(drop|delete|update|insert|truncate|alter|create|replace|grant|revoke|attach|detach|pragma|vacuum)\b")
        .expect("denylist pattern must compile")
});

/// Injection signatures: comment markers, tautologies, introspection tables.
static INJECTION_SIGNATURES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(--|/\*|\*/|\bor\s+1\s*=\s*1\b|'\s*or\s*'|\binformation_schema\b|\bsqlite_master\b)")
        .expect("injection pattern must compile")
});

static LIMIT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blimit\b").expect("limit pattern must compile"));

static GROUP_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgroup\s+by\b").expect("group-by pattern must compile"));

static AGGREGATE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(sum|count|avg|min|max)\s*\(.*\)(\s+as\s+\w+)?$")
        .expect("aggregate pattern must compile")
});

/// Why a candidate failed validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A local, deterministic, security-motivated rejection. Final.
    #[error("{0}")]
    Local(String),

    /// The database rejected the statement during the dry-run plan check.
    /// Carries the sanitized statement and the database's message verbatim,
    /// so the self-healing corrector can quote both.
    #[error("query validation failed: {message}")]
    DryRun { sql: String, message: String },
}

/// Pure sanitization: fence stripping, structural checks, denylist and
/// injection screening, and row-cap injection. No I/O.
///
/// Steps, in order:
/// 1. Strip an optional fenced code block wrapper.
/// 2. Reject if an internal `;` remains after ignoring one trailing one.
/// 3. Strip the single trailing `;`.
/// 4. Reject unless the statement starts with `SELECT`.
/// 5. Reject any denylisted keyword, anywhere in the text.
/// 6. Reject any injection-signature substring.
/// 7. Append `LIMIT <row_cap>` when no row-limiting clause is present,
///    unless the statement is a pure ungrouped aggregate (capping a single
///    aggregate row is meaningless).
pub fn sanitize(candidate: &str, row_cap: u32) -> Result<String, String> {
    let trimmed = candidate.trim();
    let inner = trimmed
        .strip_prefix("```sql")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let sql = inner.trim();

    let sql = sql.strip_suffix(';').unwrap_or(sql).trim_end();
    if sql.contains(';') {
        return Err("Multiple SQL statements are not allowed for security reasons.".to_string());
    }

    if !sql.to_lowercase().starts_with("select") {
        return Err("Only SELECT queries are allowed.".to_string());
    }

    if let Some(found) = DENYLIST.find(sql) {
        return Err(format!(
            "Query contains the forbidden operation `{}`.",
            found.as_str().to_lowercase()
        ));
    }

    if INJECTION_SIGNATURES.is_match(sql) {
        return Err("Query contains a disallowed pattern.".to_string());
    }

    let mut sql = sql.to_string();
    if !LIMIT_CLAUSE.is_match(&sql) && !is_ungrouped_aggregate(&sql) {
        sql.push_str(&format!(" LIMIT {row_cap}"));
    }
    Ok(sql)
}

/// Whether every projected column is a bare aggregate and there is no
/// grouping clause, i.e. the statement can only ever return one row.
fn is_ungrouped_aggregate(sql: &str) -> bool {
    if GROUP_BY.is_match(sql) {
        return false;
    }
    let lower = sql.to_lowercase();
    let Some(rest) = lower.strip_prefix("select") else {
        return false;
    };
    let projection = match rest.find(" from ") {
        Some(at) => &rest[..at],
        None => rest,
    };
    let projection = projection
        .trim()
        .strip_prefix("distinct")
        .map(str::trim)
        .unwrap_or_else(|| projection.trim());

    let items = split_top_level(projection);
    !items.is_empty() && items.iter().all(|item| AGGREGATE_ITEM.is_match(item.trim()))
}

/// Splits a projection list on commas that are not nested inside parentheses.
fn split_top_level(projection: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in projection.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&projection[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    items.push(&projection[start..]);
    items
}

/// Sanitization plus live dry-run validation.
#[derive(Clone)]
pub struct SqlValidator {
    db: Arc<dyn SqlDatabase>,
    row_cap: u32,
}

impl SqlValidator {
    pub fn new(db: Arc<dyn SqlDatabase>, row_cap: u32) -> Self {
        Self { db, row_cap }
    }

    /// Validates a candidate, returning the sanitized, limit-augmented
    /// statement. Never mutates stored data, even transiently: the dry-run
    /// runs inside a transaction that is never committed.
    pub async fn validate(&self, candidate: &str) -> Result<String, ValidationError> {
        let sanitized = sanitize(candidate, self.row_cap).map_err(ValidationError::Local)?;
        self.db
            .explain(&sanitized)
            .await
            .map_err(|error| ValidationError::DryRun {
                message: error
                    .database_message()
                    .unwrap_or("the database rejected the statement")
                    .to_string(),
                sql: sanitized.clone(),
            })?;
        Ok(sanitized)
    }
}
