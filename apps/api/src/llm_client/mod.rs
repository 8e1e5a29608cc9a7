//! LLM Client is the single point of entry for all completion-model calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion provider directly.
//! All LLM interactions MUST go through the `CompletionClient` trait.
//!
//! Model: command-r-08-2024 (hardcoded, shared by resume and manual analysis)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The model used for every analysis, regardless of input mode.
pub const MODEL: &str = "command-r-08-2024";
/// Low randomness keeps the output close to the requested JSON shape.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion returned empty text")]
    EmptyContent,
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub model: String,
    pub temperature: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            model: MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// A hosted text-completion service. Carried in the pipeline as
/// `Arc<dyn CompletionClient>` so tests can substitute a fake.
///
/// Implementations must not retry: one failed call is one failed request.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, params: &SamplingParams)
        -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    text: Option<String>,
    meta: Option<ChatMeta>,
}

#[derive(Debug, Deserialize)]
struct ChatMeta {
    billed_units: Option<BilledUnits>,
}

#[derive(Debug, Deserialize)]
struct BilledUnits {
    input_tokens: Option<f64>,
    output_tokens: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Cohere chat API client.
#[derive(Clone)]
pub struct CohereClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CohereClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for CohereClient {
    /// Makes a single call to the chat endpoint and returns the generated text.
    async fn complete(
        &self,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String, CompletionError> {
        if !self.has_api_key() {
            return Err(CompletionError::MissingApiKey);
        }

        let request_body = ChatRequest {
            model: &params.model,
            message: prompt,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: provider_message(body),
            });
        }

        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body)?;

        if let Some(units) = chat.meta.as_ref().and_then(|m| m.billed_units.as_ref()) {
            debug!(
                "Completion succeeded: input_tokens={:?}, output_tokens={:?}",
                units.input_tokens, units.output_tokens
            );
        }

        match chat.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CompletionError::EmptyContent),
        }
    }
}

/// Pulls the provider's `message` out of an error body, falling back to the raw body.
fn provider_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sampling_params() {
        let params = SamplingParams::default();
        assert_eq!(params.model, MODEL);
        assert!((params.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_chat_request_serializes_cohere_fields() {
        let body = ChatRequest {
            model: MODEL,
            message: "hello",
            temperature: 0.3,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "command-r-08-2024");
        assert_eq!(value["message"], "hello");
        assert!(value.get("temperature").is_some());
    }

    #[test]
    fn test_provider_message_extracts_message_field() {
        let body = r#"{"message":"invalid api token"}"#.to_string();
        assert_eq!(provider_message(body), "invalid api token");
    }

    #[test]
    fn test_provider_message_falls_back_to_raw_body() {
        let body = "Bad Gateway".to_string();
        assert_eq!(provider_message(body), "Bad Gateway");
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let client =
            CohereClient::new("key".to_string(), "https://api.cohere.com/".to_string()).unwrap();
        assert_eq!(client.chat_url(), "https://api.cohere.com/v1/chat");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        // Unroutable base URL: reaching the network would surface an Http error instead.
        let client = CohereClient::new(String::new(), "http://127.0.0.1:9".to_string()).unwrap();
        let err = client
            .complete("prompt", &SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_http_error() {
        let client = CohereClient::new("key".to_string(), "http://127.0.0.1:9".to_string()).unwrap();
        let err = client
            .complete("prompt", &SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Http(_)));
    }
}
