// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a complete pipeline with a mock provider and temp
//! SQLite files for both the cache store and the analytics database, so
//! tests exercise the real validator, executor, cache, and rate limiter.

use std::sync::Arc;
use std::time::Duration;

use insight_cache::SqliteCache;
use insight_core::{ChatProvider, InsightError};
use insight_db::Database;
use insight_pipeline::{PipelineSettings, QueryFailure, QueryPipeline, QueryResponse};

use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    settings: PipelineSettings,
    seed_data: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            settings: PipelineSettings::default(),
            seed_data: true,
        }
    }

    /// Set mock provider responses, consumed FIFO.
    pub fn with_mock_responses(mut self, responses: Vec<&str>) -> Self {
        self.responses = responses.into_iter().map(String::from).collect();
        self
    }

    /// Override pipeline settings (rate caps, TTLs, row cap).
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Skip demo-data seeding; the analytics tables start empty.
    pub fn without_seed_data(mut self) -> Self {
        self.seed_data = false;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, InsightError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| {
            InsightError::Internal(format!("failed to create temp dir: {e}"))
        })?;

        let cache_path = temp_dir.path().join("cache.db");
        let cache = Arc::new(
            SqliteCache::open(&cache_path.to_string_lossy(), Duration::from_secs(5)).await?,
        );

        let db_path = temp_dir.path().join("analytics.db");
        let db = Arc::new(
            Database::open(&db_path.to_string_lossy(), Duration::from_secs(30)).await?,
        );
        if self.seed_data {
            insight_db::seed(&db, 1).await?;
        }

        let provider = Arc::new(MockProvider::with_responses(self.responses));
        let pipeline = Arc::new(QueryPipeline::new(
            Arc::clone(&provider) as Arc<dyn ChatProvider>,
            Arc::clone(&cache) as _,
            Arc::clone(&db) as _,
            self.settings,
        ));

        Ok(TestHarness {
            pipeline,
            provider,
            cache,
            db,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired pipeline over temp storage, with the mock provider exposed
/// for scripting and call counting.
pub struct TestHarness {
    pub pipeline: Arc<QueryPipeline>,
    pub provider: Arc<MockProvider>,
    pub cache: Arc<SqliteCache>,
    pub db: Arc<Database>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Start building a harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one question through the full pipeline.
    pub async fn ask(
        &self,
        question: &str,
        conversation_id: Option<String>,
    ) -> Result<QueryResponse, QueryFailure> {
        self.pipeline.handle(question, conversation_id).await
    }
}
