// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat-completions service.
//!
//! Provides [`InferenceClient`] which handles request construction, bearer
//! authentication, bounded timeouts, and transient error retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, warn};

use insight_core::{
    Adapter, AdapterType, ChatProvider, ChatRequest, ChatResponse, HealthStatus, InsightError,
};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// HTTP client for chat-completions API communication.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    default_model: String,
    max_retries: u32,
    request_timeout: Duration,
}

impl InferenceClient {
    /// Creates a new inference client.
    ///
    /// # Arguments
    /// * `base_url` - Endpoint base, e.g. `https://models.github.ai/inference`
    /// * `api_key` - Bearer token for authentication
    /// * `model` - Default model identifier
    /// * `request_timeout` - Per-request timeout
    pub fn new(
        base_url: String,
        api_key: &str,
        model: String,
        request_timeout: Duration,
    ) -> Result<Self, InsightError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| InsightError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| InsightError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: model,
            max_retries: 1,
            request_timeout,
        })
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}

#[async_trait]
impl Adapter for InferenceClient {
    fn name(&self) -> &str {
        "chat-completions"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, InsightError> {
        // No cheap ping endpoint on the inference service; report configured.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatProvider for InferenceClient {
    /// Sends a completion request and returns the full response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, InsightError> {
        let body = ChatCompletionRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            messages: vec![
                WireMessage::system(request.system.clone()),
                WireMessage::user(request.user.clone()),
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = match self
                .client
                .post(self.completions_url())
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    return Err(InsightError::Timeout {
                        duration: self.request_timeout,
                    });
                }
                Err(e) => {
                    return Err(InsightError::Provider {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| InsightError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let parsed: ChatCompletionResponse =
                    serde_json::from_str(&text).map_err(|e| InsightError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                let choice = parsed.choices.into_iter().next().ok_or_else(|| {
                    InsightError::Provider {
                        message: "API returned no completion choices".into(),
                        source: None,
                    }
                })?;
                return Ok(ChatResponse {
                    content: choice.message.content,
                    model: parsed.model.unwrap_or_else(|| body.model.clone()),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(InsightError::Provider {
                    message: format!("API returned {status}: {text}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let text = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&text) {
                format!(
                    "API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                )
            } else {
                format!("API returned {status}: {text}")
            };
            return Err(InsightError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| InsightError::Provider {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }
}
