// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Insight pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite files for the
//! cache store and analytics database, plus a scriptable mock provider.
//! Tests are independent and order-insensitive.

use insight_pipeline::chart::ChartType;
use insight_pipeline::classifier::Verdict;
use insight_pipeline::{PipelineSettings, QueryFailure};
use insight_test_utils::TestHarness;

// ---- Intake classification ----

#[tokio::test]
async fn greeting_is_answered_without_touching_any_service() {
    let harness = TestHarness::builder()
        .without_seed_data()
        .build()
        .await
        .unwrap();

    let failure = harness.ask("hello", None).await.unwrap_err();
    match failure {
        QueryFailure::Rejected { verdict, message } => {
            assert_eq!(verdict, Verdict::Greeting);
            assert!(!message.is_empty());
        }
        other => panic!("expected greeting rejection, got {other:?}"),
    }
    assert_eq!(harness.provider.calls(), 0);
}

#[tokio::test]
async fn destructive_requests_are_stopped_at_intake() {
    let harness = TestHarness::builder()
        .without_seed_data()
        .build()
        .await
        .unwrap();

    for question in [
        "drop all customers",
        "please delete last month's sales",
        "products' or '1'='1",
    ] {
        let failure = harness.ask(question, None).await.unwrap_err();
        match failure {
            QueryFailure::Rejected { verdict, .. } => {
                assert_eq!(verdict, Verdict::InvalidOperation, "question: {question}");
            }
            other => panic!("expected rejection for {question}, got {other:?}"),
        }
    }
    assert_eq!(harness.provider.calls(), 0);
}

// ---- The full happy path ----

#[tokio::test]
async fn monthly_totals_get_a_line_chart_and_a_row_cap() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "YES",
            "SELECT substr(sale_date, 1, 7) AS month, SUM(quantity) AS total \
             FROM sales GROUP BY month ORDER BY month",
        ])
        .build()
        .await
        .unwrap();

    let response = harness
        .ask("What is the total quantity sold for each month?", None)
        .await
        .unwrap();

    assert!(response.sql.ends_with("LIMIT 1000"));
    assert!(!response.rows.is_empty());
    let hint = response.chart_hint.expect("monthly totals should chart");
    assert_eq!(hint.chart_type, ChartType::Line);
    assert_eq!(hint.label_column, "month");
    assert_eq!(hint.value_column, "total");
    assert!(response.notice.is_none());
}

#[tokio::test]
async fn category_counts_get_a_bar_chart() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "YES",
            "SELECT category, COUNT(*) AS n FROM products GROUP BY category",
        ])
        .build()
        .await
        .unwrap();

    let response = harness
        .ask("how many products are in each category", None)
        .await
        .unwrap();
    let hint = response.chart_hint.expect("category counts should chart");
    assert_eq!(hint.chart_type, ChartType::Bar);
    assert_eq!(hint.label_column, "category");
}

#[tokio::test]
async fn fenced_model_output_is_sanitized_before_execution() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["YES", "```sql\nSELECT COUNT(*) AS n FROM customers;\n```"])
        .build()
        .await
        .unwrap();

    let response = harness.ask("how many customers do we have", None).await.unwrap();
    assert_eq!(response.sql, "SELECT COUNT(*) AS n FROM customers");
    assert_eq!(response.rows[0]["n"], serde_json::json!(1000));
    // A single ungrouped aggregate row gets no chart and no row cap.
    assert!(response.chart_hint.is_none());
    assert!(!response.sql.contains("LIMIT"));
}

// ---- Self-healing ----

#[tokio::test]
async fn a_bad_column_is_corrected_once_and_flagged() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "YES",
            "SELECT revenue FROM sales",
            "SELECT SUM(quantity) AS total FROM sales",
        ])
        .build()
        .await
        .unwrap();

    let response = harness.ask("what is the total quantity sold", None).await.unwrap();
    assert_eq!(response.sql, "SELECT SUM(quantity) AS total FROM sales");
    assert!(response.notice.is_some());
    assert_eq!(harness.provider.calls(), 3);
}

#[tokio::test]
async fn exhausted_healing_returns_a_diagnosis_not_an_error() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "YES",
            "SELECT revenue FROM sales",
            "SELECT profit FROM sales",
            "There is no revenue column. Try asking about quantities or prices.",
        ])
        .build()
        .await
        .unwrap();

    let failure = harness.ask("total revenue", None).await.unwrap_err();
    match failure {
        QueryFailure::Execution { explanation, .. } => {
            assert!(explanation.contains("no revenue column"));
        }
        other => panic!("expected execution failure, got {other:?}"),
    }
    // relevancy + generation + exactly one correction + one diagnosis.
    assert_eq!(harness.provider.calls(), 4);
}

// ---- Caching and rate limiting ----

#[tokio::test]
async fn identical_questions_hit_the_response_cache() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["YES", "SELECT COUNT(*) AS n FROM products"])
        .build()
        .await
        .unwrap();

    let first = harness.ask("how many products are there", None).await.unwrap();
    let calls_after_first = harness.provider.calls();
    let second = harness
        .ask("  How MANY products are there  ", None)
        .await
        .unwrap();

    assert_eq!(first.rows, second.rows);
    assert_eq!(harness.provider.calls(), calls_after_first);
}

#[tokio::test]
async fn the_global_minute_cap_rejects_excess_requests() {
    let settings = PipelineSettings {
        requests_per_minute: 3,
        ..PipelineSettings::default()
    };
    let harness = TestHarness::builder()
        .without_seed_data()
        .with_settings(settings)
        .build()
        .await
        .unwrap();

    for _ in 0..3 {
        // Greetings are admitted by the limiter, then classified.
        let failure = harness.ask("hello", None).await.unwrap_err();
        assert!(matches!(failure, QueryFailure::Rejected { .. }));
    }
    let failure = harness.ask("hello", None).await.unwrap_err();
    assert!(matches!(failure, QueryFailure::RateLimited { .. }));
}

// ---- Conversations ----

#[tokio::test]
async fn follow_ups_reuse_the_conversation() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "YES",
            "SELECT COUNT(*) AS n FROM sales",
            "YES",
            "SELECT COUNT(DISTINCT customer_id) AS n FROM sales",
        ])
        .build()
        .await
        .unwrap();

    let first = harness
        .ask("how many sales in total", Some("conv-7".into()))
        .await
        .unwrap();
    assert_eq!(first.conversation_id, "conv-7");

    let second = harness
        .ask("and how many distinct buyers?", Some("conv-7".into()))
        .await
        .unwrap();
    assert_eq!(second.conversation_id, "conv-7");
    assert!(second.sql.contains("DISTINCT customer_id"));
    // The follow-up had history, so it could not be served from any cache.
    assert_eq!(harness.provider.calls(), 4);
}
