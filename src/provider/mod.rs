//! Provider clients for VLM and summary calls.
//!
//! Two backends share one contract: describe a page image, or summarise a
//! block of text, with a single user-turn chat request. The orchestrator
//! depends only on the [`ModelClient`] trait; [`ProviderClient`] is the
//! production dispatcher between the two concrete implementations.
//!
//! ## Error classification
//!
//! Every failure a client can produce maps into one of the three
//! [`ModelError`][crate::error::ModelError] categories — configuration,
//! transport, malformed response — so the orchestrator can branch uniformly.
//! A present-but-empty content field is **not** an error: clients return
//! `Ok("")` and the orchestrator records a "no description" placeholder for
//! that page.

pub mod ollama;
pub mod openrouter;

pub use ollama::OllamaClient;
pub use openrouter::OpenRouterClient;

use crate::config::{ProviderKind, RunConfig};
use crate::document::RenderedImage;
use crate::error::{DescribePdfError, ModelError};
use std::time::Duration;

/// Transport-level ceiling on a single model call. Vision requests against
/// large pages can legitimately take minutes.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Contract shared by every provider implementation.
///
/// Both operations issue exactly one request containing a single user-role
/// turn; `describe_image` additionally carries the rendered page inline.
#[allow(async_fn_in_trait)]
pub trait ModelClient {
    /// Describe a page image with the given prompt; returns the generated
    /// text (possibly empty when the provider answered with no content).
    async fn describe_image(
        &self,
        model: &str,
        prompt: &str,
        image: &RenderedImage,
    ) -> Result<String, ModelError>;

    /// Text-only completion used for whole-document summaries.
    async fn summarize(&self, model: &str, prompt: &str) -> Result<String, ModelError>;
}

/// Production dispatcher over the two provider implementations.
#[derive(Debug)]
pub enum ProviderClient {
    OpenRouter(OpenRouterClient),
    Ollama(OllamaClient),
}

impl ProviderClient {
    /// Build the client selected by the run configuration.
    ///
    /// Fails fast on configuration problems (missing API key) before any
    /// network traffic.
    pub fn from_config(config: &RunConfig) -> Result<Self, DescribePdfError> {
        match config.provider {
            ProviderKind::OpenRouter => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or(DescribePdfError::MissingApiKey)?;
                let client = OpenRouterClient::new(api_key)
                    .map_err(|e| DescribePdfError::InvalidConfig(e.to_string()))?;
                Ok(ProviderClient::OpenRouter(client))
            }
            ProviderKind::Ollama => {
                let client = OllamaClient::new(&config.endpoint)
                    .map_err(|e| DescribePdfError::InvalidConfig(e.to_string()))?;
                Ok(ProviderClient::Ollama(client))
            }
        }
    }

    /// Verify the backend is reachable before any page work starts.
    ///
    /// The remote provider has no cheap probe endpoint — a bad key surfaces
    /// on the first real call. The local provider answers a version probe.
    pub async fn verify_available(&self) -> Result<(), DescribePdfError> {
        match self {
            ProviderClient::OpenRouter(_) => Ok(()),
            ProviderClient::Ollama(client) => {
                if client.check_availability().await {
                    Ok(())
                } else {
                    Err(DescribePdfError::ProviderUnavailable {
                        endpoint: client.endpoint().to_string(),
                    })
                }
            }
        }
    }
}

impl ModelClient for ProviderClient {
    async fn describe_image(
        &self,
        model: &str,
        prompt: &str,
        image: &RenderedImage,
    ) -> Result<String, ModelError> {
        match self {
            ProviderClient::OpenRouter(c) => c.describe_image(model, prompt, image).await,
            ProviderClient::Ollama(c) => c.describe_image(model, prompt, image).await,
        }
    }

    async fn summarize(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        match self {
            ProviderClient::OpenRouter(c) => c.summarize(model, prompt).await,
            ProviderClient::Ollama(c) => c.summarize(model, prompt).await,
        }
    }
}

/// Map a reqwest error into the transport category with a readable message.
pub(crate) fn classify_request_error(context: &str, error: reqwest::Error) -> ModelError {
    if error.is_timeout() {
        ModelError::Transport(format!("{context} timed out"))
    } else if error.is_connect() {
        ModelError::Transport(format!("{context} connection failed: {error}"))
    } else {
        ModelError::Transport(format!("{context} request failed: {error}"))
    }
}
