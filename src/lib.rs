//! # describepdf
//!
//! Convert PDF documents into page-by-page Markdown *descriptions* using
//! Vision Language Models (VLMs).
//!
//! ## Why this crate?
//!
//! Plain text extraction loses everything that makes a document a document:
//! figures, tables, layout, charts, stamps, handwriting. Instead this crate
//! rasterises each page and asks a VLM to describe what it sees, producing a
//! readable Markdown account of every page — optionally grounded in the
//! page's extracted text layer and a once-per-document summary for context.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate   provider credentials / reachability, input file, prompts
//!  ├─ 2. Summary    (optional) full-text extraction → one LLM summary call
//!  ├─ 3. Pages      for each selected page, strictly in order:
//!  │                  render → (text layer?) → prompt → VLM call → record
//!  └─ 4. Assemble   fixed Markdown shell, one section per page
//! ```
//!
//! Pages are processed sequentially, one at a time. A classified provider
//! error (bad key, transport failure, malformed response) aborts the whole
//! run; page-local problems (a page that will not render, a missing text
//! layer) degrade to inline placeholders and the run continues.
//!
//! ## Providers
//!
//! | Provider   | Transport              | Auth        | Probe |
//! |------------|------------------------|-------------|-------|
//! | OpenRouter | HTTPS chat completions | bearer key  | none  |
//! | Ollama     | local HTTP `/api/chat` | none        | `/api/version` |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use describepdf::{convert_pdf_to_markdown, NoopProgress, ProviderKind, RunConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RunConfig::builder()
//!         .provider(ProviderKind::Ollama)
//!         .vlm_model("llama3.2-vision")
//!         .build()
//!         .unwrap();
//!     let outcome = convert_pdf_to_markdown("document.pdf", &config, &NoopProgress).await;
//!     match outcome.markdown {
//!         Some(md) => println!("{md}"),
//!         None => eprintln!("{}", outcome.status),
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `describepdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! describepdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod provider;
pub mod summary;
pub mod textlayer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{EnvConfig, PageImageFormat, PageSelection, ProviderKind, RunConfig, RunConfigBuilder};
pub use convert::convert_pdf_to_markdown;
pub use document::{DocumentAccess, PdfiumDocument, RenderedImage, SinglePagePdf};
pub use error::{DescribePdfError, ModelError};
pub use output::{format_markdown_output, ConversionOutcome, PageResult};
pub use progress::{NoopProgress, ProgressReporter};
pub use prompts::{PromptKind, PromptStore, RequiredPrompts};
pub use provider::{ModelClient, OllamaClient, OpenRouterClient, ProviderClient};
