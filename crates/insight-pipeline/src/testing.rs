// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-crate test doubles for pipeline tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use insight_core::{
    Adapter, AdapterType, CacheStore, ChatProvider, ChatRequest, ChatResponse, HealthStatus,
    InsightError,
};

/// A provider that replays a fixed script of responses.
///
/// Responses are popped FIFO; an empty queue simulates a service failure.
/// Every `complete` invocation is counted, successful or not, so tests can
/// assert exactly how many model round trips a path performs.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Adapter for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted-provider"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, InsightError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, InsightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .expect("scripted provider mutex poisoned")
            .pop_front();
        match next {
            Some(content) => Ok(ChatResponse {
                content,
                model: request.model.unwrap_or_else(|| "scripted".into()),
            }),
            None => Err(InsightError::Provider {
                message: "scripted provider exhausted".into(),
                source: None,
            }),
        }
    }
}

/// A cache store whose every operation fails, for fail-closed tests.
pub struct FailingCache;

fn unavailable() -> InsightError {
    InsightError::Cache {
        source: "cache store unreachable".into(),
    }
}

#[async_trait]
impl Adapter for FailingCache {
    fn name(&self) -> &str {
        "failing-cache"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, InsightError> {
        Ok(HealthStatus::Unhealthy("always failing".into()))
    }
}

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, InsightError> {
        Err(unavailable())
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), InsightError> {
        Err(unavailable())
    }

    async fn incr_with_expiry(
        &self,
        _key: &str,
        _window: Duration,
    ) -> Result<i64, InsightError> {
        Err(unavailable())
    }

    async fn push_capped(
        &self,
        _key: &str,
        _value: &str,
        _cap: usize,
        _ttl: Duration,
    ) -> Result<(), InsightError> {
        Err(unavailable())
    }

    async fn range(&self, _key: &str) -> Result<Vec<String>, InsightError> {
        Err(unavailable())
    }
}
