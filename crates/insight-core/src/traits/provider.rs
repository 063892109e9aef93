// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for text-generation services.

use async_trait::async_trait;

use crate::error::InsightError;
use crate::traits::adapter::Adapter;
use crate::types::{ChatRequest, ChatResponse};

/// Adapter for text-generation services.
///
/// The pipeline issues single-shot system/user completions only; the provider
/// is an opaque request/response service with a bounded timeout. Any failure
/// (network, non-success status, timeout, empty reply) surfaces as
/// `InsightError::Provider` or `InsightError::Timeout` and the calling stage
/// decides how it degrades (relevancy → reject, generation → retryable-to-user,
/// diagnosis → static fallback).
#[async_trait]
pub trait ChatProvider: Adapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, InsightError>;
}
