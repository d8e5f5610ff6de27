//! OpenAI-compatible chat completions client.
//!
//! Implements [`TextGenerator`] over any endpoint that speaks the
//! `/chat/completions` protocol (OpenAI, OpenRouter, local gateways). The
//! HTTP client carries the configured timeout, which is the only bound on a
//! generation call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pagecraft_core::{GenerationError, TextGenerator};

use crate::config::AiConfig;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client.
pub struct OpenAiClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pagecraft/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

fn failed(detail: impl Into<String>) -> GenerationError {
    GenerationError::Failed {
        detail: detail.into(),
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let Some(api_key) = &self.api_key else {
            return Err(failed("no AI key configured (set PAGECRAFT_AI_KEY)"));
        };

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.7,
        };

        tracing::info!(model = %self.model, prompt_len = prompt.len(), "AI generation request");

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::warn!("AI request timed out");
                    failed("the AI service timed out")
                } else {
                    tracing::warn!(error = %e, "AI request failed");
                    failed(format!("could not reach the AI service: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(300).collect();
            tracing::warn!(%status, body = %preview, "AI service returned an error");
            return Err(failed(format!("the AI service returned {status}")));
        }

        let reply: ChatResponse = resp
            .json()
            .await
            .map_err(|e| failed(format!("unreadable AI response: {e}")))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| failed("the AI response was empty"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: Option<&str>) -> AiConfig {
        AiConfig {
            url: "http://127.0.0.1:9/v1/chat/completions".to_owned(),
            api_key: api_key.map(str::to_owned),
            model: "test-model".to_owned(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["response_format"]["type"], "json_object");
    }

    #[test]
    fn response_parsing() {
        let reply: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"hero\":{}}"}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.choices[0].message.content.as_deref(), Some("{\"hero\":{}}"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = OpenAiClient::new(&config(None)).unwrap();
        let err = client.complete("sys", "prompt").await.unwrap_err();
        assert!(err.to_string().contains("PAGECRAFT_AI_KEY"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_generation_failure() {
        let client = OpenAiClient::new(&config(Some("sk-test"))).unwrap();
        let err = client.complete("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Failed { .. }));
    }
}
