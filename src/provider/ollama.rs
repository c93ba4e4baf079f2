//! Ollama client: local unauthenticated chat service.
//!
//! Image calls attach the rendered page as a bare base64 string in the
//! message's `images` array — Ollama's native multimodal shape, no data-URI
//! wrapper. The generated text is read from `message.content`. A lightweight
//! GET against `/api/version` serves as the availability probe the
//! orchestrator runs before any page work.

use crate::document::RenderedImage;
use crate::error::ModelError;
use crate::provider::{classify_request_error, ModelClient, REQUEST_TIMEOUT};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Probe timeout: the version endpoint answers instantly when Ollama is up.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a local Ollama instance.
#[derive(Debug)]
pub struct OllamaClient {
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl OllamaClient {
    /// Create a client for the given endpoint; trailing slashes are dropped.
    pub fn new(endpoint: &str) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Configuration(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Probe the version endpoint; `true` when Ollama answers.
    pub async fn check_availability(&self) -> bool {
        let url = format!("{}/api/version", self.endpoint);
        match self.http.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => {
                let up = response.status().is_success();
                if up {
                    info!("Ollama is available at {}", self.endpoint);
                } else {
                    warn!(
                        "Ollama version probe returned HTTP {} at {}",
                        response.status(),
                        self.endpoint
                    );
                }
                up
            }
            Err(e) => {
                warn!("could not connect to Ollama at {}: {e}", self.endpoint);
                false
            }
        }
    }

    /// Issue one non-streaming chat request and extract the generated text.
    async fn chat(
        &self,
        model: &str,
        content: &str,
        images: Option<Vec<String>>,
    ) -> Result<String, ModelError> {
        let mut message = json!({
            "role": "user",
            "content": content,
        });
        if let Some(images) = images {
            message["images"] = json!(images);
        }
        let payload = json!({
            "model": model,
            "messages": [message],
            "stream": false,
        });

        let url = format!("{}/api/chat", self.endpoint);
        debug!("calling Ollama chat API, model: {model}");

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| classify_request_error("Ollama API call", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Ollama API call failed, status {status}");
            return Err(ModelError::Transport(api_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ModelError::MalformedResponse(format!("response body was not valid JSON: {e}"))
        })?;

        parsed
            .message
            .and_then(|message| message.content)
            .ok_or_else(|| {
                ModelError::MalformedResponse("response contained no message content".into())
            })
    }
}

impl ModelClient for OllamaClient {
    async fn describe_image(
        &self,
        model: &str,
        prompt: &str,
        image: &RenderedImage,
    ) -> Result<String, ModelError> {
        let content = self
            .chat(model, prompt, Some(vec![image.to_base64()]))
            .await?;
        info!("received VLM description from Ollama (model: {model})");
        Ok(content)
    }

    async fn summarize(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let content = self.chat(model, prompt, None).await?;
        info!("received summary from Ollama (model: {model})");
        Ok(content)
    }
}

/// Ollama error bodies are `{"error": "..."}`; fall back to the raw body.
fn api_error_message(status: u16, body: &str) -> String {
    let detail: Option<String> = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_owned));
    match detail {
        Some(message) => format!("Ollama API error ({status}): {message}"),
        None => {
            let snippet: String = body.chars().take(200).collect();
            format!("Ollama API error ({status}): {snippet}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_is_normalised() {
        let client = OllamaClient::new("http://localhost:11434///").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434");
    }

    #[test]
    fn error_message_uses_error_field() {
        let body = r#"{"error": "model 'nope' not found"}"#;
        assert_eq!(
            api_error_message(404, body),
            "Ollama API error (404): model 'nope' not found"
        );
    }

    #[test]
    fn missing_message_is_malformed() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.message.and_then(|m| m.content).is_none());
    }

    #[tokio::test]
    async fn probe_fails_fast_when_nothing_listens() {
        // Port 1 is never an Ollama instance; the probe must return false,
        // not hang or error out.
        let client = OllamaClient::new("http://127.0.0.1:1").unwrap();
        assert!(!client.check_availability().await);
    }
}
