// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based intake classification.
//!
//! Maps raw question text to a terminal rejection verdict using an ordered
//! list of pattern rules, first match wins. Zero cost, no network, no
//! latency: everything a rule catches never reaches the language model.
//!
//! Rule order is load-bearing. The injection and denylist rules must run
//! before the broad off-topic catch-all, so that `"tell me a joke; drop
//! table sales"` is reported as an invalid operation, not as off-topic.

use regex::Regex;
use serde::Serialize;
use strum::Display;

/// Terminal verdict tags produced by the intake classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Greeting,
    Gratitude,
    InvalidOperation,
    OffTopic,
    HelpRequest,
    ClarificationEmpty,
    ClarificationVague,
}

/// A matched rule: the verdict plus its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub verdict: Verdict,
    pub message: String,
}

struct Rule {
    pattern: Regex,
    verdict: Verdict,
    message: &'static str,
}

const HELP_MESSAGE: &str = "I answer questions about our sales data. The database covers \
customers (signup dates), products (names, categories, prices), and sales (dates, quantities). \
Try: 'What is the total revenue for each month?' or 'List the top 5 products by quantity sold.'";

/// Ordered rule-based classifier for obvious non-queries.
pub struct IntakeClassifier {
    rules: Vec<Rule>,
}

impl IntakeClassifier {
    /// Builds the fixed rule set. Patterns are compiled once at startup.
    pub fn new() -> Self {
        let rule = |pattern: &str, verdict: Verdict, message: &'static str| Rule {
            // Patterns are literals; a failure here is a programming error
            // caught by the classifier tests.
            pattern: Regex::new(pattern).expect("classifier rule pattern must compile"),
            verdict,
            message,
        };

        let rules = vec![
            rule(
                r"^\s*$",
                Verdict::ClarificationEmpty,
                "Your question is empty. Please ask a question about our sales data.",
            ),
            rule(
                r"(?i)^\s*(hi|hello|hey|howdy|good (morning|afternoon|evening))\b",
                Verdict::Greeting,
                "Hello! I'm Insight. Ask me a question about our sales, products, or customers.",
            ),
            rule(
                r"(?i)^\s*(thanks|thank you|thx|cheers|bye|goodbye|farewell|see you)\b",
                Verdict::Gratitude,
                "You're welcome! Ask another question whenever you're ready.",
            ),
            // Injection signatures: comment markers, tautologies, UNION
            // probing, schema introspection probing.
            rule(
                r"(?i)(--|/\*|\*/|\bunion\s+(all\s+)?select\b|'\s*or\s+'?1'?\s*=\s*'?1|\bor\s+1\s*=\s*1\b|\binformation_schema\b|\bsqlite_master\b|\bxp_\w+)",
                Verdict::InvalidOperation,
                "That looks like an attempt to probe or modify the database. I can only run \
                 read-only SELECT queries against the sales data.",
            ),
            // Denylisted verbs anywhere in the text, not just at the start.
            rule(
                r"(?i)\b(drop|delete|update|insert|truncate|alter|create|replace|grant|revoke|ddl|dml)\b",
                Verdict::InvalidOperation,
                "I can only perform read-only (SELECT) queries.",
            ),
            rule(
                r"(?i)\b(help|what can you do|what can you answer|capabilities|how do i use)\b",
                Verdict::HelpRequest,
                HELP_MESSAGE,
            ),
            rule(
                r"(?i)^\s*(show me|what about|tell me something|list|can you|give me)\s*[?.!]*\s*$",
                Verdict::ClarificationVague,
                "That's a bit vague. Can you be more specific? e.g., 'List the top 5 products by sales'.",
            ),
            rule(
                r"(?i)\b(joke|weather|cook|recipe|fun fact|movie|song|beyonce|football|president|horoscope)\b",
                Verdict::OffTopic,
                "I can only answer questions related to our sales, products, or customers.",
            ),
        ];

        Self { rules }
    }

    /// Classifies a question. Returns the first matching rule's rejection,
    /// or `None` when the question should continue down the pipeline.
    ///
    /// Pure function of the input text; no side effects.
    pub fn classify(&self, question: &str) -> Option<Rejection> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(question))
            .map(|rule| Rejection {
                verdict: rule.verdict,
                message: rule.message.to_string(),
            })
    }
}

impl Default for IntakeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict_for(question: &str) -> Option<Verdict> {
        IntakeClassifier::new()
            .classify(question)
            .map(|r| r.verdict)
    }

    #[test]
    fn greetings_are_terminal() {
        assert_eq!(verdict_for("hello"), Some(Verdict::Greeting));
        assert_eq!(verdict_for("  Hi there"), Some(Verdict::Greeting));
        assert_eq!(verdict_for("good morning!"), Some(Verdict::Greeting));
    }

    #[test]
    fn gratitude_and_farewells() {
        assert_eq!(verdict_for("thanks!"), Some(Verdict::Gratitude));
        assert_eq!(verdict_for("bye"), Some(Verdict::Gratitude));
    }

    #[test]
    fn denylisted_verbs_are_caught_anywhere_in_the_text() {
        assert_eq!(verdict_for("drop all customers"), Some(Verdict::InvalidOperation));
        assert_eq!(
            verdict_for("please quietly delete the sales table"),
            Some(Verdict::InvalidOperation)
        );
        assert_eq!(
            verdict_for("could you update product prices"),
            Some(Verdict::InvalidOperation)
        );
    }

    #[test]
    fn injection_signatures_are_caught() {
        assert_eq!(
            verdict_for("list products' or '1'='1"),
            Some(Verdict::InvalidOperation)
        );
        assert_eq!(
            verdict_for("show sales -- and everything else"),
            Some(Verdict::InvalidOperation)
        );
        assert_eq!(
            verdict_for("select name union select password from users"),
            Some(Verdict::InvalidOperation)
        );
        assert_eq!(
            verdict_for("what's in information_schema.tables"),
            Some(Verdict::InvalidOperation)
        );
    }

    #[test]
    fn safety_rules_win_over_the_off_topic_catch_all() {
        // Contains an off-topic keyword AND a denylisted verb; order matters.
        assert_eq!(
            verdict_for("tell me a joke then drop table sales"),
            Some(Verdict::InvalidOperation)
        );
    }

    #[test]
    fn off_topic_keywords() {
        assert_eq!(verdict_for("tell me a joke"), Some(Verdict::OffTopic));
        assert_eq!(verdict_for("what's the weather like"), Some(Verdict::OffTopic));
    }

    #[test]
    fn help_requests_get_the_capability_message() {
        let rejection = IntakeClassifier::new().classify("help").unwrap();
        assert_eq!(rejection.verdict, Verdict::HelpRequest);
        assert!(rejection.message.contains("customers"));
        assert!(rejection.message.contains("products"));
    }

    #[test]
    fn empty_and_vague_inputs() {
        assert_eq!(verdict_for(""), Some(Verdict::ClarificationEmpty));
        assert_eq!(verdict_for("   "), Some(Verdict::ClarificationEmpty));
        assert_eq!(verdict_for("show me"), Some(Verdict::ClarificationVague));
        assert_eq!(verdict_for("can you?"), Some(Verdict::ClarificationVague));
    }

    #[test]
    fn real_questions_pass_through() {
        assert_eq!(verdict_for("What is the total revenue for each month?"), None);
        assert_eq!(verdict_for("top 5 customers by quantity"), None);
        // "list" only matches when it is the whole question.
        assert_eq!(verdict_for("list the top 5 products by sales"), None);
    }
}
