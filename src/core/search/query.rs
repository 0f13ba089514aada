//! Query normalization.
//!
//! Raw user questions are reduced to lowercase word tokens separated
//! by single spaces before they are embedded.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Everything that is neither a word character nor whitespace
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Result of processing a raw query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedQuery {
    /// False when nothing searchable is left after normalization
    pub accepted: bool,
    pub original_query: String,
    pub normalized_query: String,
}

/// Stateless query normalizer
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryProcessor;

impl QueryProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Strip punctuation, collapse whitespace and lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use docrag::core::search::QueryProcessor;
    ///
    /// let q = QueryProcessor::new().process("  What is   RAG? ");
    /// assert!(q.accepted);
    /// assert_eq!(q.normalized_query, "what is rag");
    ///
    /// assert!(!QueryProcessor::new().process("?!").accepted);
    /// ```
    pub fn process(&self, raw: &str) -> ProcessedQuery {
        let stripped = PUNCTUATION.replace_all(raw, "");
        let normalized = stripped
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        ProcessedQuery {
            accepted: !normalized.is_empty(),
            original_query: raw.to_string(),
            normalized_query: normalized,
        }
    }

    /// First `max` words of a normalized query
    pub fn keywords(&self, normalized: &str, max: usize) -> Vec<String> {
        normalized
            .split_whitespace()
            .take(max)
            .map(str::to_string)
            .collect()
    }
}
