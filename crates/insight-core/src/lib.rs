// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Insight query pipeline.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Insight workspace. The external services
//! the pipeline consumes (text generation, cache store, database) are all
//! reached through traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::InsightError;
pub use types::{AdapterType, ChatRequest, ChatResponse, HealthStatus, Row};

// Re-export all capability traits at crate root.
pub use traits::{Adapter, CacheStore, ChatProvider, SqlDatabase};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies the capability traits compile and are accessible through
        // the public API. If any module is missing or broken, this won't compile.
        fn _assert_adapter<T: Adapter>() {}
        fn _assert_provider<T: ChatProvider>() {}
        fn _assert_cache<T: CacheStore>() {}
        fn _assert_database<T: SqlDatabase>() {}
    }

    #[test]
    fn chat_responses_are_comparable() {
        let a = ChatResponse {
            content: "SELECT 1".into(),
            model: "m".into(),
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
