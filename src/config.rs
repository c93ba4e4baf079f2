//! Configuration types for a conversion run.
//!
//! All behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`] and immutable for the duration of a run. There is no
//! process-wide mutable configuration: the CLI loads environment defaults
//! into an [`EnvConfig`], merges its flags on top, and hands the orchestrator
//! one explicit value.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest, with cross-field validation in `build()`.

use crate::error::DescribePdfError;
use crate::prompts::PromptStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which backend serves the VLM and summary requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// OpenRouter: remote HTTPS service authenticated with a bearer API key.
    OpenRouter,
    /// Ollama: local unauthenticated HTTP service.
    Ollama,
}

/// Encoding used for rendered page images sent to the VLM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageImageFormat {
    /// JPEG at quality 85 — smaller payloads, the default.
    #[default]
    Jpeg,
    /// Lossless PNG — larger payloads, crisper small print.
    Png,
}

impl PageImageFormat {
    /// MIME type advertised to the provider.
    pub fn mime_type(self) -> &'static str {
        match self {
            PageImageFormat::Jpeg => "image/jpeg",
            PageImageFormat::Png => "image/png",
        }
    }
}

/// Which pages of the document to process.
///
/// Parsed from a comma-separated list of 1-based page numbers and inclusive
/// `a-b` ranges. Invalid tokens are dropped with a logged warning, never a
/// hard error; an empty selection means "all pages".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process every page in natural order (default).
    #[default]
    All,
    /// Process the listed 1-based pages (deduplicated, ascending).
    Pages(Vec<usize>),
}

impl PageSelection {
    /// Parse a selection string such as `"1, 3, 5-7"`.
    ///
    /// Whitespace around tokens is tolerated. Unparsable tokens, zero page
    /// numbers, and inverted ranges are dropped with a warning. If nothing
    /// survives (including the empty or `"all"` input), the selection is
    /// [`PageSelection::All`].
    pub fn parse(input: &str) -> PageSelection {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return PageSelection::All;
        }

        let mut pages = Vec::new();
        for token in trimmed.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if let Some((start, end)) = token.split_once('-') {
                match (start.trim().parse::<usize>(), end.trim().parse::<usize>()) {
                    (Ok(a), Ok(b)) if a >= 1 && a <= b => pages.extend(a..=b),
                    _ => warn!("dropping invalid page range '{token}'"),
                }
            } else {
                match token.parse::<usize>() {
                    Ok(p) if p >= 1 => pages.push(p),
                    _ => warn!("dropping invalid page token '{token}'"),
                }
            }
        }

        if pages.is_empty() {
            return PageSelection::All;
        }
        pages.sort_unstable();
        pages.dedup();
        PageSelection::Pages(pages)
    }

    /// Expand into sorted, deduplicated 0-based page indices.
    ///
    /// Pages beyond `total_pages` are dropped with a warning. If the result
    /// would be empty, falls back to all pages so a bad selection degrades
    /// to a full run rather than an empty one.
    pub fn resolve(&self, total_pages: usize) -> Vec<usize> {
        let indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Pages(pages) => pages
                .iter()
                .filter(|&&p| {
                    let in_range = p >= 1 && p <= total_pages;
                    if !in_range {
                        warn!("dropping page {p}: document has {total_pages} pages");
                    }
                    in_range
                })
                .map(|&p| p - 1)
                .collect(),
        };
        if indices.is_empty() {
            (0..total_pages).collect()
        } else {
            indices
        }
    }
}

/// Immutable configuration for one conversion run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Backend serving the model calls.
    pub provider: ProviderKind,
    /// OpenRouter API key; required when `provider` is OpenRouter.
    pub api_key: Option<String>,
    /// Ollama endpoint URL; used when `provider` is Ollama.
    pub endpoint: String,
    /// VLM model identifier for page descriptions.
    pub vlm_model: String,
    /// LLM model for the whole-document summary; required iff `use_summary`.
    pub summary_model: Option<String>,
    /// Language the descriptions are written in.
    pub output_language: String,
    /// Enrich each page's prompt with its extracted text layer.
    pub use_text_layer: bool,
    /// Generate a whole-document summary and feed it to every page prompt.
    pub use_summary: bool,
    /// Which pages to process. Default: all.
    pub pages: PageSelection,
    /// Rendered page image encoding. Default: JPEG.
    pub image_format: PageImageFormat,
    /// Rendering resolution. Range 72–400, default 150.
    ///
    /// 150 DPI keeps text sharp enough for a VLM while staying well below
    /// typical API upload limits. Raise it for small-font documents.
    pub dpi: u16,
    /// Prompt templates for this run. Default: the compiled-in set.
    pub prompts: PromptStore,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenRouter,
            api_key: None,
            endpoint: defaults::OLLAMA_ENDPOINT.to_string(),
            vlm_model: defaults::OPENROUTER_VLM_MODEL.to_string(),
            summary_model: None,
            output_language: defaults::OUTPUT_LANGUAGE.to_string(),
            use_text_layer: false,
            use_summary: false,
            pages: PageSelection::All,
            image_format: PageImageFormat::default(),
            dpi: 150,
            prompts: PromptStore::builtin(),
        }
    }
}

impl RunConfig {
    /// Create a new builder.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.config.provider = provider;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn vlm_model(mut self, model: impl Into<String>) -> Self {
        self.config.vlm_model = model.into();
        self
    }

    pub fn summary_model(mut self, model: impl Into<String>) -> Self {
        self.config.summary_model = Some(model.into());
        self
    }

    pub fn output_language(mut self, language: impl Into<String>) -> Self {
        self.config.output_language = language.into();
        self
    }

    pub fn use_text_layer(mut self, v: bool) -> Self {
        self.config.use_text_layer = v;
        self
    }

    pub fn use_summary(mut self, v: bool) -> Self {
        self.config.use_summary = v;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn image_format(mut self, format: PageImageFormat) -> Self {
        self.config.image_format = format;
        self
    }

    pub fn dpi(mut self, dpi: u16) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn prompts(mut self, store: PromptStore) -> Self {
        self.config.prompts = store;
        self
    }

    /// Build the configuration, validating cross-field constraints.
    pub fn build(self) -> Result<RunConfig, DescribePdfError> {
        let c = &self.config;
        if c.vlm_model.trim().is_empty() {
            return Err(DescribePdfError::InvalidConfig(
                "VLM model must not be empty".into(),
            ));
        }
        if c.use_summary && c.summary_model.as_deref().is_none_or(|m| m.trim().is_empty()) {
            return Err(DescribePdfError::InvalidConfig(
                "a summary model is required when summaries are enabled".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Fallback values used when neither the environment nor the CLI sets one.
pub mod defaults {
    pub const OPENROUTER_VLM_MODEL: &str = "qwen/qwen2.5-vl-72b-instruct";
    pub const OPENROUTER_SUMMARY_MODEL: &str = "google/gemini-2.5-flash-preview";
    pub const OLLAMA_ENDPOINT: &str = "http://localhost:11434";
    pub const OLLAMA_VLM_MODEL: &str = "llama3.2-vision";
    pub const OLLAMA_SUMMARY_MODEL: &str = "qwen2.5";
    pub const OUTPUT_LANGUAGE: &str = "English";
}

/// Defaults loaded from the environment (and a `.env` file when present).
///
/// These are the same variable names the tool has always honoured; the CLI
/// merges its flags on top of them to produce the final [`RunConfig`].
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub openrouter_api_key: Option<String>,
    pub openrouter_vlm_model: String,
    pub openrouter_summary_model: String,
    pub ollama_endpoint: String,
    pub ollama_vlm_model: String,
    pub ollama_summary_model: String,
    pub output_language: String,
    pub use_text_layer: bool,
    pub use_summary: bool,
}

impl EnvConfig {
    /// Load configuration from environment variables, reading `.env` first.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        let flag = |name: &str| {
            var(name)
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        Self {
            openrouter_api_key: var("OPENROUTER_API_KEY"),
            openrouter_vlm_model: var("DEFAULT_OR_VLM_MODEL")
                .unwrap_or_else(|| defaults::OPENROUTER_VLM_MODEL.to_string()),
            openrouter_summary_model: var("DEFAULT_OR_SUMMARY_MODEL")
                .unwrap_or_else(|| defaults::OPENROUTER_SUMMARY_MODEL.to_string()),
            ollama_endpoint: var("OLLAMA_ENDPOINT")
                .unwrap_or_else(|| defaults::OLLAMA_ENDPOINT.to_string()),
            ollama_vlm_model: var("DEFAULT_OLLAMA_VLM_MODEL")
                .unwrap_or_else(|| defaults::OLLAMA_VLM_MODEL.to_string()),
            ollama_summary_model: var("DEFAULT_OLLAMA_SUMMARY_MODEL")
                .unwrap_or_else(|| defaults::OLLAMA_SUMMARY_MODEL.to_string()),
            output_language: var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|| defaults::OUTPUT_LANGUAGE.to_string()),
            use_text_layer: flag("DEFAULT_USE_TEXT_LAYER"),
            use_summary: flag("DEFAULT_USE_SUMMARY"),
        }
    }
}
