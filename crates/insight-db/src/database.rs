// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`SqlDatabase`] trait.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Both the dry-run and execution paths open an explicit transaction
//! and roll it back: the pipeline only ever reads, and the explicit boundary
//! keeps statement state from leaking across pooled calls.
//!
//! [`SqlDatabase`]: insight_core::SqlDatabase

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use insight_core::{Adapter, AdapterType, HealthStatus, InsightError, Row, SqlDatabase};

use crate::schema;

/// SQLite-backed analytics database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    op_timeout: Duration,
}

/// Unwrap the database's own error text so callers can quote it verbatim.
fn map_tr_err(err: tokio_rusqlite::Error) -> InsightError {
    let message = match &err {
        tokio_rusqlite::Error::Error(e) => e.to_string(),
        other => other.to_string(),
    };
    InsightError::Database {
        message,
        source: Some(Box::new(err)),
    }
}

impl Database {
    /// Opens (or creates) the analytics database at `path` and ensures the
    /// fixed schema exists.
    pub async fn open(path: &str, op_timeout: Duration) -> Result<Self, InsightError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::Error(e)))?;
        let db = Self { conn, op_timeout };
        db.init_schema().await?;
        debug!(path, "analytics database opened");
        Ok(db)
    }

    /// Opens an in-memory analytics database (tests).
    pub async fn open_in_memory(op_timeout: Duration) -> Result<Self, InsightError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::Error(e)))?;
        let db = Self { conn, op_timeout };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), InsightError> {
        self.call_timed(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;",
            )?;
            conn.execute_batch(schema::DDL)?;
            Ok(())
        })
        .await
    }

    /// Runs `f` on the connection's background thread under the op timeout.
    ///
    /// A timed-out operation is reported as a database error (not a bare
    /// timeout) so the pipeline treats it like any other execution failure,
    /// eligible for self-healing.
    pub(crate) async fn call_timed<T, F>(&self, f: F) -> Result<T, InsightError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.op_timeout, self.conn.call(f)).await {
            Ok(result) => result.map_err(map_tr_err),
            Err(_) => Err(InsightError::Database {
                message: format!("statement timed out after {:?}", self.op_timeout),
                source: None,
            }),
        }
    }
}

/// Convert a SQLite value into its JSON representation.
fn value_ref_to_json(value: rusqlite::types::ValueRef<'_>) -> serde_json::Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::String(format!("<{} byte blob>", b.len())),
    }
}

#[async_trait]
impl Adapter for Database {
    fn name(&self) -> &str {
        "sqlite-analytics"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Database
    }

    async fn health_check(&self) -> Result<HealthStatus, InsightError> {
        self.call_timed(|conn| {
            conn.execute_batch("SELECT 1;")?;
            Ok(())
        })
        .await?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SqlDatabase for Database {
    async fn explain(&self, sql: &str) -> Result<(), InsightError> {
        let explain_sql = format!("EXPLAIN {sql}");
        self.call_timed(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&explain_sql)?;
                let mut rows = stmt.query([])?;
                // Drain the plan rows without materializing anything.
                while rows.next()?.is_some() {}
            }
            tx.rollback()?;
            Ok(())
        })
        .await
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>, InsightError> {
        let sql = sql.to_string();
        self.call_timed(move |conn| {
            let tx = conn.transaction()?;
            let records = {
                let mut stmt = tx.prepare(&sql)?;
                let column_names: Vec<String> =
                    stmt.column_names().iter().map(|s| s.to_string()).collect();
                let mapped = stmt.query_map([], |row| {
                    let mut record = Row::new();
                    for (idx, name) in column_names.iter().enumerate() {
                        record.insert(name.clone(), value_ref_to_json(row.get_ref(idx)?));
                    }
                    Ok(record)
                })?;
                let mut records = Vec::new();
                for record in mapped {
                    records.push(record?);
                }
                records
            };
            // Read-only, so commit and rollback are equivalent; the rollback
            // makes the no-mutation contract explicit.
            tx.rollback()?;
            Ok(records)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::SqlDatabase;

    async fn open_db() -> Database {
        let db = Database::open_in_memory(Duration::from_secs(5)).await.unwrap();
        db.call_timed(|conn| {
            conn.execute_batch(
                "INSERT INTO customers (id, name, signup_date) VALUES
                     (1, 'Ada', '2023-01-15'), (2, 'Grace', '2023-02-20');
                 INSERT INTO products (id, name, category, price) VALUES
                     (1, 'Laptop', 'Electronics', 999.0), (2, 'Novel', 'Books', 12.5);
                 INSERT INTO sales (id, customer_id, product_id, sale_date, quantity) VALUES
                     (1, 1, 1, '2023-03-01', 1), (2, 2, 2, '2023-03-02', 3);",
            )?;
            Ok(())
        })
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn query_returns_rows_in_projection_order() {
        let db = open_db().await;
        let rows = db
            .query("SELECT name, price FROM products ORDER BY id")
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        let columns: Vec<&String> = rows[0].keys().collect();
        assert_eq!(columns, ["name", "price"]);
        assert_eq!(rows[0]["name"], serde_json::json!("Laptop"));
        assert_eq!(rows[1]["price"], serde_json::json!(12.5));
    }

    #[tokio::test]
    async fn explain_accepts_a_valid_statement() {
        let db = open_db().await;
        db.explain("SELECT * FROM sales LIMIT 10").await.unwrap();
    }

    #[tokio::test]
    async fn explain_reports_the_databases_message() {
        let db = open_db().await;
        let err = db
            .explain("SELECT nonexistent_column FROM sales")
            .await
            .unwrap_err();
        let message = err.database_message().expect("database error expected");
        assert!(message.contains("nonexistent_column"), "got: {message}");
    }

    #[tokio::test]
    async fn query_errors_carry_the_databases_message() {
        let db = open_db().await;
        let err = db.query("SELECT * FROM no_such_table").await.unwrap_err();
        assert!(err.database_message().is_some());
    }

    #[tokio::test]
    async fn aggregates_come_back_as_numbers() {
        let db = open_db().await;
        let rows = db
            .query("SELECT COUNT(*) AS n, SUM(quantity) AS total FROM sales")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["n"], serde_json::json!(2));
        assert_eq!(rows[0]["total"], serde_json::json!(4));
    }
}
