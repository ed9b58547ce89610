/// Mock search provider for tests and local development
///
/// Returns a canned result or a canned failure without touching the
/// network, and counts how often it was called.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ProviderError, SearchProvider, SearchResult};

enum Behavior {
    Succeed(SearchResult),
    Fail,
}

/// Deterministic in-memory provider
pub struct MockProvider {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Provider that answers every query with the given text
    pub fn succeeding(text: &str) -> Self {
        Self {
            behavior: Behavior::Succeed(SearchResult {
                text: text.to_string(),
                citations: vec![],
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that answers with text and citations
    pub fn succeeding_with_citations(text: &str, citations: Vec<String>) -> Self {
        Self {
            behavior: Behavior::Succeed(SearchResult {
                text: text.to_string(),
                citations,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that fails every query
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many queries this provider has served
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, _query: &str) -> Result<SearchResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(result) => Ok(result.clone()),
            Behavior::Fail => Err(ProviderError::Upstream {
                status: 503,
                message: "mock failure".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success_and_call_count() {
        let provider = MockProvider::succeeding("answer");
        let result = provider.search("q").await.unwrap();
        assert_eq!(result.text, "answer");

        provider.search("q2").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let provider = MockProvider::failing();
        assert!(provider.search("q").await.is_err());
        assert_eq!(provider.call_count(), 1);
    }
}
