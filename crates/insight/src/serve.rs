// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `insight serve` and `insight seed` command implementations.
//!
//! Wires the concrete adapters (chat-completions client, SQLite cache store,
//! SQLite analytics database) into the pipeline and hands it to the gateway.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use insight_cache::SqliteCache;
use insight_config::InsightConfig;
use insight_core::InsightError;
use insight_db::Database;
use insight_llm::InferenceClient;
use insight_pipeline::{PipelineSettings, QueryPipeline};

/// Build the pipeline from configuration and serve the gateway.
pub async fn run(config: InsightConfig) -> Result<(), InsightError> {
    let api_key = config
        .llm
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            InsightError::Config(
                "llm.api_key is not set; configure it in insight.toml or INSIGHT_LLM_API_KEY"
                    .to_string(),
            )
        })?;

    let provider = Arc::new(InferenceClient::new(
        config.llm.endpoint.clone(),
        api_key,
        config.llm.model.clone(),
        Duration::from_secs(config.llm.request_timeout_secs),
    )?);

    let cache = Arc::new(
        SqliteCache::open(
            &config.cache.path,
            Duration::from_millis(config.cache.op_timeout_ms),
        )
        .await?,
    );

    let db = Arc::new(
        Database::open(
            &config.database.path,
            Duration::from_millis(config.database.op_timeout_ms),
        )
        .await?,
    );

    let settings = PipelineSettings::from_config(&config);
    let pipeline = Arc::new(QueryPipeline::new(provider, cache, db, settings));

    info!(
        service = config.agent.name.as_str(),
        model = config.llm.model.as_str(),
        bind = config.server.bind.as_str(),
        "starting gateway"
    );
    insight_gateway::serve(pipeline, &config.server.bind).await
}

/// Clear and repopulate the analytics database with demo data.
pub async fn seed(config: InsightConfig, seed: u64) -> Result<(), InsightError> {
    let db = Database::open(
        &config.database.path,
        Duration::from_millis(config.database.op_timeout_ms),
    )
    .await?;
    let report = insight_db::seed(&db, seed).await?;
    println!(
        "seeded {} customers, {} products, {} sales into {}",
        report.customers, report.products, report.sales, config.database.path
    );
    Ok(())
}
