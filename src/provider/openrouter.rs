//! OpenRouter client: remote keyed chat-completions service.
//!
//! Image calls embed the rendered page as a base64 data URI inside an
//! OpenAI-style multimodal content array; text calls send a plain string
//! content. The generated text is read from `choices[0].message.content`;
//! a response missing that path is classified as malformed.

use crate::document::RenderedImage;
use crate::error::ModelError;
use crate::provider::{classify_request_error, ModelClient, REQUEST_TIMEOUT};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Chat completions endpoint.
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Client for the OpenRouter chat-completions API.
#[derive(Debug)]
pub struct OpenRouterClient {
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Configuration(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            http,
        })
    }

    /// Issue one chat request and extract the generated text.
    async fn chat(&self, model: &str, messages: Value) -> Result<String, ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::Configuration(
                "OpenRouter API key is missing".into(),
            ));
        }

        let payload = json!({
            "model": model,
            "messages": messages,
        });
        debug!("calling OpenRouter API, model: {model}");

        let response = self
            .http
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| classify_request_error("OpenRouter API call", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenRouter API call failed, status {status}");
            return Err(ModelError::Transport(api_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ModelError::MalformedResponse(format!("response body was not valid JSON: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                ModelError::MalformedResponse(
                    "response contained no message content".into(),
                )
            })
    }
}

impl ModelClient for OpenRouterClient {
    async fn describe_image(
        &self,
        model: &str,
        prompt: &str,
        image: &RenderedImage,
    ) -> Result<String, ModelError> {
        let messages = json!([{
            "role": "user",
            "content": [
                { "type": "text", "text": prompt },
                { "type": "image_url", "image_url": { "url": image.to_data_uri() } },
            ],
        }]);
        let content = self.chat(model, messages).await?;
        info!("received VLM description from OpenRouter (model: {model})");
        Ok(content)
    }

    async fn summarize(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let messages = json!([{ "role": "user", "content": prompt }]);
        let content = self.chat(model, messages).await?;
        info!("received summary from OpenRouter (model: {model})");
        Ok(content)
    }
}

/// Build a readable transport message from an error response.
///
/// OpenRouter wraps errors in `{"error": {"message": ...}}`; fall back to a
/// truncated raw body when the envelope is missing or unparsable.
fn api_error_message(status: u16, body: &str) -> String {
    let envelope: Option<String> = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned));
    match envelope {
        Some(message) => format!("API error ({status}): {message}"),
        None => {
            let snippet: String = body.chars().take(200).collect();
            format!("API error ({status}): {snippet}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_provider_envelope() {
        let body = r#"{"error": {"message": "model not found", "code": 404}}"#;
        assert_eq!(
            api_error_message(404, body),
            "API error (404): model not found"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(
            api_error_message(502, "<html>bad gateway</html>"),
            "API error (502): <html>bad gateway</html>"
        );
    }

    #[test]
    fn error_message_truncates_long_bodies() {
        let body = "x".repeat(1000);
        let msg = api_error_message(500, &body);
        assert!(msg.len() < 250, "got {} chars", msg.len());
    }

    #[test]
    fn missing_content_is_malformed() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {}}]}"#).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        assert!(content.is_none());
    }

    #[test]
    fn empty_content_is_not_malformed() {
        // An empty string in the content field parses as Some("") — the
        // orchestrator, not the client, decides what to do with it.
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": ""}}]}"#).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        assert_eq!(content.as_deref(), Some(""));
    }
}
