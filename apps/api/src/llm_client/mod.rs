/// Completion client — the single point of entry for all chat-completion calls.
///
/// No other module may call the completion API directly. Callers hold an
/// `Arc<dyn CompletionClient>` so tests can swap in a scripted backend.
///
/// One attempt per call: there is no retry or backoff.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;

/// Sampling temperature for every analysis call.
pub const TEMPERATURE: f32 = 0.3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Tagged failure of a completion call. The display text is what gets shown
/// in place of the analysis when a call fails.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Error generating response: OpenAI API key is missing")]
    Unconfigured,

    #[error("Error generating response: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error generating response: API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Error generating response: malformed completion payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Error generating response: completion returned no content")]
    EmptyContent,
}

/// A remote text-completion service, consumed as an opaque request/response
/// function.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the composed payload as the user message and returns the trimmed
    /// text of the first choice.
    async fn complete(&self, payload: &str) -> Result<String, CompletionError>;

    /// `false` when calls are guaranteed to fail with `Unconfigured`.
    fn is_configured(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Trimmed text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, base_url: &str) -> Result<Self, CompletionError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            model,
            endpoint: chat_completions_url(base_url),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, payload: &str) -> Result<String, CompletionError> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::ANALYZER_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: payload,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &chat.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyContent)
    }
}

/// Stand-in used when no API key is configured. Fails every call without
/// touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredClient;

#[async_trait]
impl CompletionClient for UnconfiguredClient {
    async fn complete(&self, _payload: &str) -> Result<String, CompletionError> {
        Err(CompletionError::Unconfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Builds the completion backend for this process from configuration.
pub fn build_completion_client(
    config: &Config,
) -> Result<std::sync::Arc<dyn CompletionClient>, CompletionError> {
    match &config.openai_api_key {
        Some(key) => Ok(std::sync::Arc::new(OpenAiClient::new(
            key.clone(),
            config.openai_model.clone(),
            &config.openai_base_url,
        )?)),
        None => Ok(std::sync::Arc::new(UnconfiguredClient)),
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_completions_url_handles_trailing_slash() {
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:11434/v1"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_response_text_is_trimmed_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  Match: 82%\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 120, "completion_tokens": 8, "total_tokens": 128}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Match: 82%"));
    }

    #[test]
    fn test_response_without_choices_has_no_text() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_error_display_is_prefixed() {
        let err = CompletionError::Api {
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("Error generating response:"));
        assert!(rendered.contains("429"));
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_fast() {
        let client = UnconfiguredClient;
        assert!(!client.is_configured());
        let err = client.complete("anything").await.unwrap_err();
        assert!(matches!(err, CompletionError::Unconfigured));
    }

    #[test]
    fn test_missing_key_builds_unconfigured_backend() {
        let client = build_completion_client(&Config::default()).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_present_key_builds_configured_backend() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let client = build_completion_client(&config).unwrap();
        assert!(client.is_configured());
    }
}
