// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway router construction and serving.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use insight_core::InsightError;
use insight_pipeline::QueryPipeline;

use crate::handlers;

/// Shared state for gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<QueryPipeline>,
}

/// Builds the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/query", post(handlers::post_query))
        .route("/v1/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves the gateway until the process exits.
pub async fn serve(pipeline: Arc<QueryPipeline>, addr: &str) -> Result<(), InsightError> {
    let app = router(GatewayState { pipeline });
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| InsightError::Config(format!("failed to bind {addr}: {e}")))?;
    info!(%addr, "gateway listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| InsightError::Internal(format!("gateway server error: {e}")))
}
