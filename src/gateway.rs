//! Completion service client
//!
//! The gateway makes exactly one attempt per call. It has no retry loop and no
//! timeout of its own; the engine recovers from every failure by falling back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::error::UpstreamError;
use crate::prompt::Prompt;

/// Anything that can turn a prompt into raw completion text
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError>;

    /// Whether a credential is present (calls may still fail)
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Can be null for some models
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for OpenAI-compatible chat-completions endpoints
pub struct OpenAiGateway {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl OpenAiGateway {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError> {
        let Some(api_key) = self.config.api_key() else {
            return Err(UpstreamError::NoCredentials);
        };

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user_payload,
                },
            ],
        };

        let url = self.endpoint();
        tracing::debug!(url = %url, model = %self.config.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::TransportError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate(&text, 320));
            return Err(UpstreamError::ServiceRejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| UpstreamError::TransportError {
                    message: format!("invalid completion envelope: {}", e),
                })?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::TransportError {
                message: "completion contained no message content".to_string(),
            })
    }

    fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let gateway = OpenAiGateway::new(CompletionConfig {
            api_key: None,
            // Unroutable; reaching the network would fail differently
            base_url: "http://127.0.0.1:9".to_string(),
            ..CompletionConfig::default()
        });
        assert!(!gateway.is_configured());

        let result = gateway.complete(&Prompt::new("sys", "user")).await;
        assert_eq!(result, Err(UpstreamError::NoCredentials));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let gateway = OpenAiGateway::new(CompletionConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..CompletionConfig::default()
        });
        assert_eq!(gateway.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 3), "abc...");
    }
}
