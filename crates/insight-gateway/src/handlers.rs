// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/query and GET /v1/health. The handlers only translate
//! between HTTP and the pipeline's typed outcomes; all policy lives in the
//! pipeline.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use insight_core::{Adapter, HealthStatus};
use insight_pipeline::QueryFailure;

use crate::server::GatewayState;

/// Request body for POST /v1/query.
#[derive(Debug, Deserialize)]
pub struct QueryApiRequest {
    /// The natural-language question.
    pub question: String,
    /// Optional conversation to continue; a new one is opened if absent.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
    /// The failing statement, when one was executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

/// Response body for GET /v1/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: `ok` or `degraded`.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Per-adapter health.
    pub adapters: Vec<AdapterHealth>,
}

/// Health of a single adapter.
#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub kind: String,
    pub status: String,
}

/// Maps a pipeline failure to its HTTP status.
///
/// Client-input failures come back as 200 with an error body so the UI can
/// render them inline; only infrastructure-shaped failures get error codes.
pub fn status_for(failure: &QueryFailure) -> StatusCode {
    match failure {
        QueryFailure::Rejected { .. }
        | QueryFailure::NotRelevant
        | QueryFailure::Validation { .. }
        | QueryFailure::Execution { .. } => StatusCode::OK,
        QueryFailure::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        QueryFailure::RateLimiterUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        QueryFailure::Generation => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /v1/query
pub async fn post_query(
    State(state): State<GatewayState>,
    Json(body): Json<QueryApiRequest>,
) -> Response {
    match state
        .pipeline
        .handle(&body.question, body.conversation_id)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(failure) => {
            let status = status_for(&failure);
            let sql = match &failure {
                QueryFailure::Execution { sql, .. } => Some(sql.clone()),
                _ => None,
            };
            let body = ErrorResponse {
                error: failure.to_string(),
                sql,
            };
            (status, Json(body)).into_response()
        }
    }
}

fn status_label(status: &HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "healthy".to_string(),
        HealthStatus::Degraded(reason) => format!("degraded: {reason}"),
        HealthStatus::Unhealthy(reason) => format!("unhealthy: {reason}"),
    }
}

/// GET /v1/health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (provider, cache, db) = state.pipeline.adapters();

    let mut adapters = Vec::with_capacity(3);
    let mut all_healthy = true;
    let checks: [(&str, &str, Result<HealthStatus, _>); 3] = [
        (
            provider.name(),
            "provider",
            provider.health_check().await,
        ),
        (cache.name(), "cache", cache.health_check().await),
        (db.name(), "database", db.health_check().await),
    ];
    for (name, kind, result) in checks {
        let status = match result {
            Ok(status) => {
                if status != HealthStatus::Healthy {
                    all_healthy = false;
                }
                status_label(&status)
            }
            Err(error) => {
                all_healthy = false;
                format!("unhealthy: {error}")
            }
        };
        adapters.push(AdapterHealth {
            name: name.to_string(),
            kind: kind.to_string(),
            status,
        });
    }

    let body = HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        adapters,
    };
    (StatusCode::OK, Json(body)).into_response()
}
