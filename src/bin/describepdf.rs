//! CLI binary for describepdf.
//!
//! A thin shim over the library crate that merges environment defaults with
//! CLI flags into a `RunConfig`, drives the conversion with a terminal
//! progress bar, and writes the resulting Markdown to a file.

use anyhow::{bail, Context, Result};
use clap::Parser;
use describepdf::{
    convert_pdf_to_markdown, EnvConfig, PageImageFormat, PageSelection, ProgressReporter,
    PromptStore, ProviderKind, RunConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion via OpenRouter (key from OPENROUTER_API_KEY / .env)
  describepdf input.pdf

  # Write to a specific file, output in Spanish
  describepdf input.pdf -o output.md -l Spanish

  # Local Ollama with a vision model
  describepdf --local -m llama3.2-vision input.pdf

  # Enrich prompts with the text layer and a document summary
  describepdf --use-text-layer --use-summary input.pdf

  # Only some pages
  describepdf --pages 1,3,5-7 input.pdf

ENVIRONMENT VARIABLES (a .env file is honoured):
  OPENROUTER_API_KEY           OpenRouter API key
  DEFAULT_OR_VLM_MODEL         Default OpenRouter VLM model
  DEFAULT_OR_SUMMARY_MODEL     Default OpenRouter summary model
  OLLAMA_ENDPOINT              Ollama endpoint (default http://localhost:11434)
  DEFAULT_OLLAMA_VLM_MODEL     Default Ollama VLM model
  DEFAULT_OLLAMA_SUMMARY_MODEL Default Ollama summary model
  DEFAULT_LANGUAGE             Output language (default English)
  DEFAULT_USE_TEXT_LAYER       true/false
  DEFAULT_USE_SUMMARY          true/false
"#;

/// Convert PDF files to detailed Markdown descriptions.
#[derive(Parser, Debug)]
#[command(
    name = "describepdf",
    version,
    about = "Convert PDF files to detailed Markdown descriptions using Vision Language Models",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file to process.
    pdf_file: PathBuf,

    /// Path to the output Markdown file (default: <pdf_name>_description.md).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// OpenRouter API key (overrides the one in .env).
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Use local Ollama instead of OpenRouter.
    #[arg(long)]
    local: bool,

    /// Ollama endpoint URL (default: http://localhost:11434).
    #[arg(long)]
    endpoint: Option<String>,

    /// VLM model to use (default: configured in .env).
    #[arg(short = 'm', long)]
    vlm_model: Option<String>,

    /// Output language (default: configured in .env).
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Enrich each page's prompt with its extracted text layer.
    #[arg(long)]
    use_text_layer: bool,

    /// Generate a whole-document summary and feed it to every page prompt.
    #[arg(long)]
    use_summary: bool,

    /// Model for the summary (default: configured in .env).
    #[arg(long)]
    summary_model: Option<String>,

    /// Pages to process: all, 5, 3-15, or 1,3,5-7.
    #[arg(long, default_value = "all")]
    pages: String,

    /// Rendered page image format.
    #[arg(long, value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// Rendering DPI (72–400).
    #[arg(long, default_value_t = 150,
          value_parser = clap::value_parser!(u16).range(72..=400))]
    dpi: u16,

    /// Directory of prompt template overrides.
    #[arg(long)]
    prompt_dir: Option<PathBuf>,

    /// Verbose mode (show debug messages).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for PageImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Jpeg => PageImageFormat::Jpeg,
            FormatArg::Png => PageImageFormat::Png,
        }
    }
}

/// Terminal progress bar driven by the library's fractional callback.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{bar:42.green/238}] {pos:>3}%  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn report(&self, progress: f32, status: &str) {
        let position = (progress.clamp(0.0, 1.0) * 100.0) as u64;
        if position > self.bar.position() {
            self.bar.set_position(position);
        }
        self.bar.set_message(status.to_string());
    }
}

fn mask_key(key: &str) -> String {
    if key.len() > 5 {
        format!("********{}", &key[key.len() - 5..])
    } else {
        "*****".to_string()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if !cli.pdf_file.exists() || !cli.pdf_file.is_file() {
        bail!(
            "the PDF file '{}' does not exist or is not a valid file",
            cli.pdf_file.display()
        );
    }

    // ── Merge environment defaults with CLI flags ────────────────────────
    let env = EnvConfig::load();
    let provider = if cli.local {
        ProviderKind::Ollama
    } else {
        ProviderKind::OpenRouter
    };

    let use_text_layer = cli.use_text_layer || env.use_text_layer;
    let use_summary = cli.use_summary || env.use_summary;

    let vlm_model = cli.vlm_model.unwrap_or(match provider {
        ProviderKind::OpenRouter => env.openrouter_vlm_model,
        ProviderKind::Ollama => env.ollama_vlm_model,
    });
    let summary_model = cli.summary_model.unwrap_or(match provider {
        ProviderKind::OpenRouter => env.openrouter_summary_model,
        ProviderKind::Ollama => env.ollama_summary_model,
    });
    let api_key = cli.api_key.or(env.openrouter_api_key);
    let endpoint = cli.endpoint.unwrap_or(env.ollama_endpoint);
    let language = cli.language.unwrap_or(env.output_language);

    let prompts = match &cli.prompt_dir {
        Some(dir) => PromptStore::from_dir(dir),
        None => PromptStore::builtin(),
    };

    let mut builder = RunConfig::builder()
        .provider(provider)
        .endpoint(&endpoint)
        .vlm_model(&vlm_model)
        .output_language(&language)
        .use_text_layer(use_text_layer)
        .use_summary(use_summary)
        .pages(PageSelection::parse(&cli.pages))
        .image_format(cli.format.into())
        .dpi(cli.dpi)
        .prompts(prompts);
    if let Some(ref key) = api_key {
        builder = builder.api_key(key);
    }
    if use_summary {
        builder = builder.summary_model(&summary_model);
    }
    let config = builder.build().context("invalid configuration")?;

    // ── Configuration summary ────────────────────────────────────────────
    let file_name = cli
        .pdf_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.pdf_file.display().to_string());
    println!("Processing PDF: {file_name}");
    match provider {
        ProviderKind::OpenRouter => {
            println!("Provider: openrouter");
            match &api_key {
                Some(key) => println!("OpenRouter API Key: {}", mask_key(key)),
                None => println!("OpenRouter API Key: Not provided"),
            }
        }
        ProviderKind::Ollama => {
            println!("Provider: ollama");
            println!("Ollama Endpoint: {endpoint}");
        }
    }
    println!("VLM Model: {vlm_model}");
    println!("Language: {language}");
    println!("Text layer: {}", if use_text_layer { "Yes" } else { "No" });
    println!("Summary: {}", if use_summary { "Yes" } else { "No" });
    if use_summary {
        println!("Summary model: {summary_model}");
    }
    println!();

    // ── Run conversion ───────────────────────────────────────────────────
    let progress = CliProgress::new();
    let outcome = convert_pdf_to_markdown(&cli.pdf_file, &config, &progress).await;
    progress.bar.finish_and_clear();

    let Some(markdown) = outcome.markdown else {
        bail!("{}", outcome.status);
    };

    // ── Write output ─────────────────────────────────────────────────────
    let output_path = cli.output.unwrap_or_else(|| {
        let stem = cli
            .pdf_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        PathBuf::from(format!("{stem}_description.md"))
    });
    std::fs::write(&output_path, &markdown)
        .with_context(|| format!("could not write output file '{}'", output_path.display()))?;

    println!("{}", outcome.status);
    println!("Conversion completed. Result saved to: {}", output_path.display());
    Ok(())
}
