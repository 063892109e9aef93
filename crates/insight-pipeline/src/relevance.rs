// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed relevancy firewall.
//!
//! One cheap, constrained language-model round trip deciding whether a
//! question is answerable from the fixed schema at all, consulted before any
//! SQL is generated. Decisions are cached; the provider is only asked on a
//! miss. Fails toward rejection: if the provider is unreachable or replies
//! with anything but an affirmative, the question is refused.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use insight_cache::{keys, CacheExt};
use insight_core::{CacheStore, ChatProvider, ChatRequest};
use insight_db::schema;

const SYSTEM_ROLE: &str = "You are a relevancy checker.";

/// Output cap for the YES/NO reply; keeps the call fast and cheap.
const MAX_ANSWER_TOKENS: u32 = 5;

/// Cached YES/NO gate in front of SQL generation.
pub struct RelevancyFirewall {
    provider: Arc<dyn ChatProvider>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl RelevancyFirewall {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    /// Whether `question` is answerable from the schema's topical domain.
    ///
    /// Cache failures degrade to a miss; provider failures degrade to `false`.
    pub async fn is_relevant(&self, question: &str) -> bool {
        let key = keys::relevance_key(question);

        match self.cache.get_json::<bool>(&key).await {
            Ok(Some(decision)) => {
                debug!(decision, "relevancy decision served from cache");
                return decision;
            }
            Ok(None) => {}
            Err(error) => warn!(%error, "relevancy cache read failed, treating as miss"),
        }

        let prompt = format!(
            "The user asked the following question: \"{question}\"\n\n\
             My database contains information ONLY about {}.\n\n\
             Is the user's question answerable using ONLY this data? \
             Answer with a single word: YES or NO.",
            schema::TOPIC_DOMAIN,
        );
        let request =
            ChatRequest::deterministic(SYSTEM_ROLE, prompt).with_max_tokens(MAX_ANSWER_TOKENS);

        let decision = match self.provider.complete(request).await {
            Ok(response) => response.content.to_uppercase().contains("YES"),
            Err(error) => {
                warn!(%error, "relevancy check failed, rejecting question");
                return false;
            }
        };

        // Cache the decision whichever way it went.
        if let Err(error) = self.cache.set_json(&key, &decision, self.ttl).await {
            warn!(%error, "relevancy cache write failed");
        }
        decision
    }
}
