// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions client for the Insight query pipeline.
//!
//! Provides [`InferenceClient`], the [`ChatProvider`] implementation used in
//! production. The pipeline itself only sees the trait.
//!
//! [`ChatProvider`]: insight_core::ChatProvider

pub mod client;
pub mod types;

pub use client::InferenceClient;
