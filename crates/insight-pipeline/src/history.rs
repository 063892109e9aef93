// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded per-conversation history of (question, SQL) pairs.
//!
//! Stored as a capped JSON list in the shared cache store, so follow-up
//! questions can be resolved against recent context by any worker. The
//! entry's TTL is refreshed on every append; an idle conversation expires
//! an hour after its last write.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use insight_cache::keys;
use insight_core::CacheStore;

/// One answered question: what was asked and what was executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub sql: String,
}

/// Cache-backed conversation history.
pub struct ConversationHistory {
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
    turns: usize,
}

impl ConversationHistory {
    pub fn new(cache: Arc<dyn CacheStore>, ttl: Duration, turns: usize) -> Self {
        Self { cache, ttl, turns }
    }

    /// The most recent turns for a conversation, oldest first.
    ///
    /// Cache failures degrade to an empty history, never to a failed request.
    pub async fn recent(&self, conversation_id: &str) -> Vec<ConversationTurn> {
        let key = keys::history_key(conversation_id);
        let raw = match self.cache.range(&key).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "history read failed, continuing without context");
                return Vec::new();
            }
        };
        raw.iter()
            .filter_map(|entry| serde_json::from_str(entry).ok())
            .collect()
    }

    /// Appends a turn after a successful execution, trimming to the cap and
    /// refreshing the conversation's lifetime.
    pub async fn append(&self, conversation_id: &str, turn: &ConversationTurn) {
        let key = keys::history_key(conversation_id);
        let serialized = match serde_json::to_string(turn) {
            Ok(serialized) => serialized,
            Err(error) => {
                warn!(%error, "history turn failed to serialize");
                return;
            }
        };
        if let Err(error) = self
            .cache
            .push_capped(&key, &serialized, self.turns, self.ttl)
            .await
        {
            warn!(%error, "history append failed");
        }
    }
}
