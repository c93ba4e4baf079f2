//! Error types for the describepdf library.
//!
//! Two distinct error types reflect two distinct failure scopes:
//!
//! * [`DescribePdfError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing credential, unreachable local provider, unreadable document,
//!   missing prompt template, or a classified model error on any page).
//!   Converted into a [`crate::output::ConversionOutcome`] with no Markdown
//!   at the top level.
//!
//! * [`ModelError`] — the classified result of a single provider call. Both
//!   provider implementations map their failures into the same three
//!   categories so the orchestrator can branch uniformly without knowing
//!   which backend produced the error.
//!
//! Page-local conditions (a page that fails to render, a text-layer
//! extraction that comes back empty) are not errors at all: they degrade into
//! inline placeholder text and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by a conversion run.
#[derive(Debug, Error)]
pub enum DescribePdfError {
    /// The remote provider was selected but no API key is available.
    #[error("OpenRouter API key is missing")]
    MissingApiKey,

    /// The local provider did not answer its version probe.
    #[error("could not connect to Ollama at {endpoint}; make sure it is running")]
    ProviderUnavailable { endpoint: String },

    /// The input path does not exist or is not a regular file.
    #[error("invalid or missing PDF file: '{path}'")]
    InvalidInput { path: PathBuf },

    /// The file could not be parsed as a PDF, or it contains no pages.
    #[error("could not process PDF file or PDF is empty: '{name}'")]
    UnreadableDocument { name: String },

    /// A prompt template required by the requested feature set is absent.
    #[error("missing required prompt templates: {missing}")]
    MissingPrompts { missing: String },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A classified provider error surfaced during a page's model call.
    ///
    /// This aborts the whole run: a configuration, transport, or
    /// malformed-response error on one page means the provider is unusable
    /// for every remaining page as well.
    #[error("API error on page {page}: {source}. Aborting")]
    Api {
        page: usize,
        #[source]
        source: ModelError,
    },
}

/// Classified failure of a single provider request.
///
/// Both [`crate::provider::OpenRouterClient`] and
/// [`crate::provider::OllamaClient`] produce exactly these categories.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// A credential or parameter was missing before any network call.
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// Connection refused, timeout, or an error envelope from the provider.
    ///
    /// The message carries the provider's own error text when the response
    /// body contained one.
    #[error("{0}")]
    Transport(String),

    /// HTTP success but the expected content field was absent.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
