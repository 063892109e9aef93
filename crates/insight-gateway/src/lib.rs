// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin HTTP surface over the Insight query pipeline.
//!
//! One POST endpoint runs the pipeline; the handlers map its typed failure
//! taxonomy to status codes (client-input failures → 200 with an error body,
//! rate limiting → 429, limiter outage → 503, generation/internal → 500).

pub mod handlers;
pub mod server;

pub use server::{router, serve, GatewayState};
