/// Perplexity search provider
///
/// Calls the Perplexity chat completions API with the query as a single
/// user message and returns the first choice's content plus any citations.
///
/// # Configuration
///
/// - `PERPLEXITY_API_KEY` (required; its absence is a provider error, not a
///   startup error, so a misconfigured deployment degrades to failed
///   searches rather than refusing to boot)
/// - model: `sonar`, max_tokens: 4000, matching the product defaults

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ProviderError, SearchProvider, SearchResult};

const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
const MODEL: &str = "sonar";
const MAX_TOKENS: u32 = 4000;

/// Production search provider backed by the Perplexity API
pub struct PerplexityProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl PerplexityProvider {
    /// Creates a provider reading the API key from the environment
    ///
    /// `request_timeout` bounds each upstream call so a hung search becomes
    /// a failed transition instead of an abandoned claim.
    pub fn new(api_key: Option<String>, request_timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(request_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Overrides the API endpoint; used by tests against a local stub
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn parse_response(body: ChatResponse) -> Result<SearchResult, ProviderError> {
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("empty choices array".to_string()))?;

        Ok(SearchResult {
            text: choice.message.content,
            citations: body.citations,
        })
    }
}

#[async_trait]
impl SearchProvider for PerplexityProvider {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential("PERPLEXITY_API_KEY".to_string()))?;

        debug!(query_len = query.len(), "Dispatching search query");

        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: query,
            }],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Self::parse_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_happy_path() {
        let body: ChatResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "The answer."}}],
                "citations": ["https://example.com"]
            }"#,
        )
        .unwrap();

        let result = PerplexityProvider::parse_response(body).unwrap();
        assert_eq!(result.text, "The answer.");
        assert_eq!(result.citations, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn test_parse_response_without_citations() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "Bare."}}]}"#,
        )
        .unwrap();

        let result = PerplexityProvider::parse_response(body).unwrap();
        assert_eq!(result.text, "Bare.");
        assert!(result.citations.is_empty());
    }

    #[test]
    fn test_parse_response_empty_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            PerplexityProvider::parse_response(body),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_provider_error() {
        let provider = PerplexityProvider::new(None, Duration::from_secs(1));
        let result = provider.search("anything").await;
        assert!(matches!(result, Err(ProviderError::MissingCredential(_))));
    }
}
