/// Search provider contract and implementations
///
/// A provider turns a query string (the item's title) into markdown text.
/// The worker is provider-agnostic; `PerplexityProvider` is the production
/// implementation and `MockProvider` exists for tests and local runs.
///
/// Providers never write to the database. The orchestrator owns the
/// searching → {completed, failed} transition and records a provider
/// failure into the item itself rather than propagating it.

mod mock;
mod perplexity;

pub use mock::MockProvider;
pub use perplexity::PerplexityProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Provider failure
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required credential is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Transport-level failure reaching the upstream API
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Upstream answered 2xx but the body was not in the expected shape
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

/// Successful search output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Markdown answer text
    pub text: String,

    /// Source URLs cited by the answer, in citation order
    pub citations: Vec<String>,
}

impl SearchResult {
    /// Renders the result as markdown with citations appended
    ///
    /// Citations become a numbered reference list after the answer text;
    /// a result without citations renders as the bare text.
    pub fn to_markdown(&self) -> String {
        if self.citations.is_empty() {
            return self.text.clone();
        }

        let mut out = String::with_capacity(self.text.len() + self.citations.len() * 64);
        out.push_str(&self.text);
        out.push_str("\n\n---\n\n");
        for (i, url) in self.citations.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, url));
        }
        out
    }
}

/// Contract every search provider implements
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Executes the query and returns the answer
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on any transport, upstream, or configuration
    /// failure. The caller translates this into the item's failed state.
    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_without_citations() {
        let result = SearchResult {
            text: "Plain answer".to_string(),
            citations: vec![],
        };
        assert_eq!(result.to_markdown(), "Plain answer");
    }

    #[test]
    fn test_markdown_appends_numbered_references() {
        let result = SearchResult {
            text: "Answer [1][2]".to_string(),
            citations: vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
        };

        let md = result.to_markdown();
        assert!(md.starts_with("Answer [1][2]\n\n---\n\n"));
        assert!(md.contains("1. https://example.com/a\n"));
        assert!(md.contains("2. https://example.com/b\n"));
    }
}
