//! The page-processing orchestrator.
//!
//! One sequential pipeline drives the whole conversion: validate the
//! provider and input, resolve the prompt templates, open the document,
//! optionally generate the document summary, then walk the selected pages
//! one at a time —
//!
//! ```text
//! render ──▶ (text layer?) ──▶ prompt select ──▶ model call ──▶ record
//! ```
//!
//! Failure handling bifurcates at the model-call boundary. A classified
//! [`ModelError`][crate::error::ModelError] aborts the entire run (the
//! provider is unusable for every remaining page, and a silently truncated
//! document must not look complete). Everything else — a page that fails to
//! render, a text layer that cannot be extracted, a prompt variant missing
//! for a partially-degraded page — is page-local: an inline placeholder is
//! recorded and the loop moves on.
//!
//! Pages are processed strictly in ascending selected order, one at a time.
//! That bounds memory to one rendered image and one temp file, and makes
//! progress reporting and error attribution unambiguous. Results are keyed
//! by page number, so assembly order never depends on completion order.

use crate::config::RunConfig;
use crate::document::{DocumentAccess, PdfiumDocument};
use crate::error::DescribePdfError;
use crate::output::{format_markdown_output, ConversionOutcome, PageResult};
use crate::progress::ProgressReporter;
use crate::prompts::{self, PromptKind, RequiredPrompts};
use crate::provider::{ModelClient, ProviderClient};
use crate::{summary, textlayer};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Progress allowance consumed by summary generation.
const SUMMARY_ALLOWANCE: f32 = 0.05;
/// Progress allowance consumed by document analysis.
const ANALYSIS_ALLOWANCE: f32 = 0.05;
/// Page processing fills progress up to here; the rest is final assembly.
const PAGE_PHASE_END: f32 = 0.98;

/// Convert a PDF into a page-by-page Markdown description.
///
/// This is the primary entry point. Every terminal outcome is a
/// [`ConversionOutcome`]: a populated status message, plus the assembled
/// Markdown on success (which may itself contain per-page placeholders) or
/// `None` on fatal failure.
pub async fn convert_pdf_to_markdown(
    pdf_path: impl AsRef<Path>,
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> ConversionOutcome {
    let started = Instant::now();
    let pdf_path = pdf_path.as_ref();
    progress.report(0.0, "Starting conversion process...");
    info!("starting conversion of {}", pdf_path.display());

    match prepare_and_run(pdf_path, config, progress, started).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("conversion failed: {e}");
            ConversionOutcome::failure(&e)
        }
    }
}

/// Validation and setup, then the per-document pipeline.
///
/// Order matters: provider problems and missing prompt templates must
/// surface before any page is rendered, and the prompt check runs before
/// the document is even opened.
async fn prepare_and_run(
    pdf_path: &Path,
    config: &RunConfig,
    progress: &dyn ProgressReporter,
    started: Instant,
) -> Result<ConversionOutcome, DescribePdfError> {
    let client = ProviderClient::from_config(config)?;
    client.verify_available().await?;

    if !pdf_path.exists() || !pdf_path.is_file() {
        return Err(DescribePdfError::InvalidInput {
            path: pdf_path.to_path_buf(),
        });
    }
    let original_filename = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf_path.display().to_string());
    info!("processing file: {original_filename}");

    let required = config
        .prompts
        .required_for(config.use_text_layer, config.use_summary)
        .map_err(|missing| DescribePdfError::MissingPrompts {
            missing: missing.join(", "),
        })?;

    let doc = PdfiumDocument::open(pdf_path)?;

    run_document_pipeline(
        &doc,
        &original_filename,
        &client,
        config,
        &required,
        progress,
        started,
    )
    .await
}

/// Drive one opened document through summary generation and the page loop.
async fn run_document_pipeline<D, C>(
    doc: &D,
    original_filename: &str,
    client: &C,
    config: &RunConfig,
    required: &RequiredPrompts,
    progress: &dyn ProgressReporter,
    started: Instant,
) -> Result<ConversionOutcome, DescribePdfError>
where
    D: DocumentAccess + ?Sized,
    C: ModelClient,
{
    // ── Summary (best-effort, once per run) ──────────────────────────────
    let mut summary_progress = 0.0;
    let pdf_summary = if config.use_summary {
        summary_progress = SUMMARY_ALLOWANCE;
        let model = config.summary_model.as_deref().unwrap_or_default();
        progress.report(
            summary_progress,
            &format!("Generating summary using {model}..."),
        );
        let generated = summary::generate_summary(doc, client, model, required).await;
        match &generated {
            Some(_) => progress.report(summary_progress, "Summary generated."),
            None => {
                // Degrade gracefully: the rest of the run behaves as if
                // summaries were never requested.
                progress.report(
                    summary_progress,
                    "Warning: Could not generate summary.",
                );
                warn!("failed to generate PDF summary; continuing without it");
            }
        }
        generated
    } else {
        None
    };

    // ── Document analysis ────────────────────────────────────────────────
    let load_progress = summary_progress + ANALYSIS_ALLOWANCE;
    progress.report(load_progress, "Analyzing PDF structure...");
    let total_pages = doc.page_count();
    if total_pages == 0 {
        return Err(DescribePdfError::UnreadableDocument {
            name: original_filename.to_string(),
        });
    }
    progress.report(
        load_progress,
        &format!("PDF has {total_pages} pages. Starting page processing..."),
    );

    let indices = config.pages.resolve(total_pages);
    let selected_total = indices.len();
    let page_ratio = PAGE_PHASE_END - load_progress;

    // ── Page loop ────────────────────────────────────────────────────────
    let mut results: Vec<PageResult> = Vec::with_capacity(selected_total);

    for (rank, &index) in indices.iter().enumerate() {
        let page_num = index + 1;
        let current =
            load_progress + ((rank + 1) as f32 / selected_total as f32) * page_ratio;
        progress.report(
            current,
            &format!("Processing page {page_num}/{total_pages}..."),
        );
        info!("processing page {page_num}/{total_pages}");

        // RENDER — failure skips the model call entirely.
        progress.report(current, &format!("Page {page_num}: Rendering image..."));
        let Some(image) = doc.render_page(index, config.image_format, config.dpi) else {
            warn!("could not render image for page {page_num}; skipping VLM call");
            results.push(PageResult::new(
                page_num,
                format!("*Error: Could not render image for page {page_num}.*"),
            ));
            continue;
        };

        // TEXT LAYER — additive context; every failure degrades to none.
        // The single-page temp file lives only for this block and is
        // removed on drop no matter which branch runs.
        let mut text_context: Option<String> = None;
        if config.use_text_layer {
            progress.report(
                current,
                &format!("Page {page_num}: Extracting text layer..."),
            );
            match doc.materialize_page(index) {
                Some(single_page) => {
                    text_context = textlayer::extract_page_text(single_page.path());
                    if text_context.is_none() {
                        warn!("text-layer extraction failed for page {page_num}; proceeding without it");
                        progress.report(
                            current,
                            &format!("Page {page_num}: Text-layer extraction failed."),
                        );
                    }
                }
                None => {
                    warn!("could not create single-page PDF for page {page_num}");
                    progress.report(
                        current,
                        &format!("Page {page_num}: Failed to prepare text-layer extraction."),
                    );
                }
            }
        }

        // PROMPT SELECT — keyed on what was actually produced, not merely
        // requested; mixed-template runs are possible by design.
        let has_text_layer = config.use_text_layer && text_context.is_some();
        let has_summary = config.use_summary && pdf_summary.is_some();
        let kind = PromptKind::for_page(has_text_layer, has_summary);
        let Some(template) = required.get(kind) else {
            error!("missing prompt template '{kind}' for page {page_num}");
            results.push(PageResult::new(
                page_num,
                format!("*Error: Could not generate description for page {page_num} due to missing prompt template.*"),
            ));
            continue;
        };
        let prompt = prompts::fill_page_prompt(
            template,
            page_num,
            total_pages,
            &config.output_language,
            text_context.as_deref(),
            pdf_summary.as_deref(),
        );

        // MODEL CALL — classified errors abort the whole run.
        progress.report(
            current,
            &format!("Page {page_num}: Calling VLM ({})...", config.vlm_model),
        );
        match client.describe_image(&config.vlm_model, &prompt, &image).await {
            Ok(description) if !description.trim().is_empty() => {
                info!("VLM description received for page {page_num}");
                results.push(PageResult::new(page_num, description));
            }
            Ok(_) => {
                warn!("VLM returned no description for page {page_num}");
                progress.report(
                    current,
                    &format!("Page {page_num}: VLM returned no description."),
                );
                results.push(PageResult::new(
                    page_num,
                    format!("*Warning: VLM did not return a description for page {page_num}.*"),
                ));
            }
            Err(api_err) => {
                let abort = DescribePdfError::Api {
                    page: page_num,
                    source: api_err,
                };
                progress.report(current, &abort.to_string());
                error!("{abort}");
                return Err(abort);
            }
        }
    }

    // ── Final assembly ───────────────────────────────────────────────────
    progress.report(0.99, "Combining page descriptions into final Markdown...");
    let markdown = format_markdown_output(&results, original_filename);
    info!("final Markdown content assembled");

    let outcome = ConversionOutcome::success(markdown, started.elapsed());
    progress.report(1.0, &outcome.status);
    info!("{}", outcome.status);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PageImageFormat, PageSelection, ProviderKind};
    use crate::document::{RenderedImage, SinglePagePdf};
    use crate::error::ModelError;
    use crate::progress::NoopProgress;
    use crate::prompts::PromptStore;
    use std::collections::{HashSet, VecDeque};
    use std::path::PathBuf;
    use std::sync::Mutex;

    // ── Fakes ────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct FakeDocument {
        pages: usize,
        fail_render: HashSet<usize>,
        fail_materialize: bool,
        text: Option<String>,
        rendered: Mutex<Vec<usize>>,
        materialized: Mutex<Vec<PathBuf>>,
    }

    impl FakeDocument {
        fn with_pages(pages: usize) -> Self {
            Self {
                pages,
                ..Self::default()
            }
        }

        fn render_count(&self) -> usize {
            self.rendered.lock().unwrap().len()
        }
    }

    impl DocumentAccess for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn render_page(
            &self,
            index: usize,
            format: PageImageFormat,
            _dpi: u16,
        ) -> Option<RenderedImage> {
            self.rendered.lock().unwrap().push(index);
            if self.fail_render.contains(&index) {
                return None;
            }
            Some(RenderedImage {
                bytes: vec![0xFF, 0xD8, 0xFF],
                mime_type: format.mime_type(),
            })
        }

        fn materialize_page(&self, _index: usize) -> Option<SinglePagePdf> {
            if self.fail_materialize {
                return None;
            }
            let tmp = tempfile::Builder::new()
                .prefix("describepdf_page_")
                .suffix(".pdf")
                .tempfile()
                .unwrap();
            std::fs::write(tmp.path(), b"not a real pdf").unwrap();
            let temp_path = tmp.into_temp_path();
            self.materialized
                .lock()
                .unwrap()
                .push(temp_path.to_path_buf());
            Some(SinglePagePdf::from_temp_path(temp_path))
        }

        fn extract_all_text(&self) -> Option<String> {
            self.text.clone()
        }
    }

    struct FakeClient {
        describe_replies: Mutex<VecDeque<Result<String, ModelError>>>,
        describe_prompts: Mutex<Vec<String>>,
        summary_reply: Result<String, ModelError>,
    }

    impl FakeClient {
        fn with_replies(replies: Vec<Result<String, ModelError>>) -> Self {
            Self {
                describe_replies: Mutex::new(replies.into()),
                describe_prompts: Mutex::new(Vec::new()),
                summary_reply: Ok("unused".into()),
            }
        }

        fn describe_count(&self) -> usize {
            self.describe_prompts.lock().unwrap().len()
        }
    }

    impl ModelClient for FakeClient {
        async fn describe_image(
            &self,
            _model: &str,
            prompt: &str,
            _image: &RenderedImage,
        ) -> Result<String, ModelError> {
            self.describe_prompts.lock().unwrap().push(prompt.to_string());
            self.describe_replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected describe_image call")
        }

        async fn summarize(&self, _model: &str, _prompt: &str) -> Result<String, ModelError> {
            self.summary_reply.clone()
        }
    }

    struct RecordingProgress {
        fractions: Mutex<Vec<f32>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn report(&self, progress: f32, _status: &str) {
            self.fractions.lock().unwrap().push(progress);
        }
    }

    fn base_config() -> RunConfig {
        RunConfig::builder()
            .provider(ProviderKind::OpenRouter)
            .api_key("test-key")
            .vlm_model("test-vlm")
            .build()
            .unwrap()
    }

    async fn run(
        doc: &FakeDocument,
        client: &FakeClient,
        config: &RunConfig,
    ) -> Result<ConversionOutcome, DescribePdfError> {
        let required = config
            .prompts
            .required_for(config.use_text_layer, config.use_summary)
            .unwrap();
        run_document_pipeline(
            doc,
            "test.pdf",
            client,
            config,
            &required,
            &NoopProgress,
            Instant::now(),
        )
        .await
    }

    // ── Pipeline behaviour ───────────────────────────────────────────────

    #[tokio::test]
    async fn two_page_run_produces_exact_markdown() {
        let doc = FakeDocument::with_pages(2);
        let client = FakeClient::with_replies(vec![
            Ok("Page one content.".into()),
            Ok("Page two content.".into()),
        ]);
        let outcome = run(&doc, &client, &base_config()).await.unwrap();

        assert!(outcome.status.starts_with("Conversion completed successfully"));
        assert_eq!(
            outcome.markdown.as_deref().unwrap(),
            "# Description of PDF: test.pdf\n\n## Page 1\n\nPage one content.\n\n---\n\n## Page 2\n\nPage two content.\n\n---\n\n"
        );
    }

    #[tokio::test]
    async fn transport_error_aborts_run_and_skips_remaining_pages() {
        let doc = FakeDocument::with_pages(5);
        let client = FakeClient::with_replies(vec![
            Ok("First page.".into()),
            Err(ModelError::Transport("API error (503): down".into())),
        ]);
        let err = run(&doc, &client, &base_config()).await.unwrap_err();

        assert!(matches!(err, DescribePdfError::Api { page: 2, .. }));
        // Pages 3–5 were never rendered once the abort fired.
        assert!(doc.render_count() <= 2, "rendered {} pages", doc.render_count());
    }

    #[tokio::test]
    async fn malformed_response_aborts_like_transport() {
        let doc = FakeDocument::with_pages(3);
        let client = FakeClient::with_replies(vec![Err(ModelError::MalformedResponse(
            "no content".into(),
        ))]);
        let err = run(&doc, &client, &base_config()).await.unwrap_err();
        assert!(matches!(err, DescribePdfError::Api { page: 1, .. }));
        assert_eq!(doc.render_count(), 1);
    }

    #[tokio::test]
    async fn render_failure_degrades_only_that_page() {
        let mut doc = FakeDocument::with_pages(3);
        doc.fail_render.insert(1); // page 2
        let client = FakeClient::with_replies(vec![
            Ok("First page.".into()),
            Ok("Third page.".into()),
        ]);
        let outcome = run(&doc, &client, &base_config()).await.unwrap();
        let md = outcome.markdown.unwrap();

        assert!(md.contains("First page."));
        assert!(md.contains("*Error: Could not render image for page 2.*"));
        assert!(md.contains("Third page."));
        // The model was never called for the failed page.
        assert_eq!(client.describe_count(), 2);
    }

    #[tokio::test]
    async fn empty_model_reply_records_placeholder_and_continues() {
        let doc = FakeDocument::with_pages(2);
        let client = FakeClient::with_replies(vec![
            Ok("  ".into()),
            Ok("Second page.".into()),
        ]);
        let outcome = run(&doc, &client, &base_config()).await.unwrap();
        let md = outcome.markdown.unwrap();

        assert!(md.contains("*Warning: VLM did not return a description for page 1.*"));
        assert!(md.contains("Second page."));
    }

    #[tokio::test]
    async fn selection_processes_exactly_the_selected_pages_in_order() {
        let doc = FakeDocument::with_pages(8);
        let client = FakeClient::with_replies(vec![
            Ok("D1".into()),
            Ok("D3".into()),
            Ok("D5".into()),
            Ok("D6".into()),
            Ok("D7".into()),
        ]);
        let mut config = base_config();
        config.pages = PageSelection::parse("1,3,5-7");

        let outcome = run(&doc, &client, &config).await.unwrap();
        let md = outcome.markdown.unwrap();

        for present in [1, 3, 5, 6, 7] {
            assert!(md.contains(&format!("## Page {present}\n")), "page {present} missing");
        }
        for absent in [2, 4, 8] {
            assert!(!md.contains(&format!("## Page {absent}\n")), "page {absent} present");
        }
        let positions: Vec<usize> = [1, 3, 5, 6, 7]
            .iter()
            .map(|p| md.find(&format!("## Page {p}\n")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "sections out of order");
    }

    #[tokio::test]
    async fn invalid_selection_falls_back_to_all_pages() {
        let doc = FakeDocument::with_pages(3);
        let client = FakeClient::with_replies(vec![
            Ok("A".into()),
            Ok("B".into()),
            Ok("C".into()),
        ]);
        let mut config = base_config();
        config.pages = PageSelection::parse("0,abc,9-2");

        let outcome = run(&doc, &client, &config).await.unwrap();
        let md = outcome.markdown.unwrap();
        assert!(md.contains("## Page 1\n"));
        assert!(md.contains("## Page 2\n"));
        assert!(md.contains("## Page 3\n"));
    }

    #[tokio::test]
    async fn total_pages_placeholder_uses_document_count_not_selection() {
        let doc = FakeDocument::with_pages(9);
        let client = FakeClient::with_replies(vec![Ok("only".into())]);
        let mut config = base_config();
        config.pages = PageSelection::parse("4");

        run(&doc, &client, &config).await.unwrap();
        let prompts = client.describe_prompts.lock().unwrap();
        assert!(prompts[0].contains("page 4 of 9"), "got: {}", prompts[0]);
    }

    // ── Summary behaviour ────────────────────────────────────────────────

    fn summary_config() -> RunConfig {
        RunConfig::builder()
            .provider(ProviderKind::OpenRouter)
            .api_key("test-key")
            .use_summary(true)
            .summary_model("test-llm")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn summary_feeds_every_page_prompt() {
        let mut doc = FakeDocument::with_pages(2);
        doc.text = Some("document body".into());
        let mut client = FakeClient::with_replies(vec![Ok("A".into()), Ok("B".into())]);
        client.summary_reply = Ok("THE-DOCUMENT-SUMMARY".into());

        run(&doc, &client, &summary_config()).await.unwrap();
        let prompts = client.describe_prompts.lock().unwrap();
        assert!(prompts.iter().all(|p| p.contains("THE-DOCUMENT-SUMMARY")));
    }

    #[tokio::test]
    async fn summary_failure_degrades_to_base_prompt_for_all_pages() {
        let mut doc = FakeDocument::with_pages(2);
        doc.text = Some("document body".into());
        let mut client = FakeClient::with_replies(vec![Ok("A".into()), Ok("B".into())]);
        client.summary_reply = Err(ModelError::Transport("API error (500): boom".into()));

        let outcome = run(&doc, &client, &summary_config()).await.unwrap();
        assert!(outcome.is_success(), "summary failure must not abort the run");

        let prompts = client.describe_prompts.lock().unwrap();
        // The summary-variant template never fired; pages used the base one.
        assert!(prompts.iter().all(|p| !p.contains("summary of the whole document")));
        assert!(prompts.iter().all(|p| !p.contains("N/A")));
    }

    #[tokio::test]
    async fn mixed_template_page_records_placeholder_when_variant_unresolved() {
        // Text layer and summary both requested, so the required set is
        // {base, full, summary}. The text layer fails on every page while
        // the summary succeeds — the wanted summary-only variant was never
        // resolved, so the page degrades to a placeholder.
        let mut doc = FakeDocument::with_pages(1);
        doc.text = Some("document body".into());
        doc.fail_materialize = true;
        let mut client = FakeClient::with_replies(vec![]);
        client.summary_reply = Ok("summary".into());

        let config = RunConfig::builder()
            .provider(ProviderKind::OpenRouter)
            .api_key("test-key")
            .use_text_layer(true)
            .use_summary(true)
            .summary_model("test-llm")
            .build()
            .unwrap();

        let outcome = run(&doc, &client, &config).await.unwrap();
        let md = outcome.markdown.unwrap();
        assert!(md.contains(
            "*Error: Could not generate description for page 1 due to missing prompt template.*"
        ));
        assert_eq!(client.describe_count(), 0);
    }

    // ── Cleanup and progress ─────────────────────────────────────────────

    #[tokio::test]
    async fn text_layer_temp_files_are_removed_after_success() {
        let doc = FakeDocument::with_pages(3);
        let client = FakeClient::with_replies(vec![
            Ok("A".into()),
            Ok("B".into()),
            Ok("C".into()),
        ]);
        let mut config = base_config();
        config.use_text_layer = true;

        run(&doc, &client, &config).await.unwrap();

        let created = doc.materialized.lock().unwrap();
        assert_eq!(created.len(), 3);
        for path in created.iter() {
            assert!(!path.exists(), "temp file leaked: {}", path.display());
        }
    }

    #[tokio::test]
    async fn text_layer_temp_files_are_removed_after_abort() {
        let doc = FakeDocument::with_pages(3);
        let client = FakeClient::with_replies(vec![Err(ModelError::Transport(
            "API error (503): down".into(),
        ))]);
        let mut config = base_config();
        config.use_text_layer = true;

        run(&doc, &client, &config).await.unwrap_err();

        let created = doc.materialized.lock().unwrap();
        assert!(!created.is_empty());
        for path in created.iter() {
            assert!(!path.exists(), "temp file leaked: {}", path.display());
        }
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_at_one() {
        let mut doc = FakeDocument::with_pages(3);
        doc.text = Some("document body".into());
        let mut client = FakeClient::with_replies(vec![
            Ok("A".into()),
            Ok("B".into()),
            Ok("C".into()),
        ]);
        client.summary_reply = Ok("summary".into());

        let config = summary_config();
        let required = config.prompts.required_for(false, true).unwrap();
        let reporter = RecordingProgress {
            fractions: Mutex::new(Vec::new()),
        };
        run_document_pipeline(
            &doc,
            "test.pdf",
            &client,
            &config,
            &required,
            &reporter,
            Instant::now(),
        )
        .await
        .unwrap();

        let fractions = reporter.fractions.lock().unwrap();
        assert!(
            fractions.windows(2).all(|w| w[0] <= w[1]),
            "progress regressed: {fractions:?}"
        );
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[tokio::test]
    async fn empty_document_is_fatal() {
        let doc = FakeDocument::with_pages(0);
        let client = FakeClient::with_replies(vec![]);
        let err = run(&doc, &client, &base_config()).await.unwrap_err();
        assert!(matches!(err, DescribePdfError::UnreadableDocument { .. }));
    }

    // ── Top-level outcome behaviour ──────────────────────────────────────

    #[tokio::test]
    async fn missing_api_key_fails_before_touching_the_file() {
        let config = RunConfig::builder()
            .provider(ProviderKind::OpenRouter)
            .build()
            .unwrap();
        let outcome =
            convert_pdf_to_markdown("/nonexistent/whatever.pdf", &config, &NoopProgress).await;
        assert!(!outcome.is_success());
        assert!(outcome.status.contains("OpenRouter API key is missing"));
    }

    #[tokio::test]
    async fn missing_input_file_fails_with_status() {
        let config = base_config();
        let outcome =
            convert_pdf_to_markdown("/nonexistent/whatever.pdf", &config, &NoopProgress).await;
        assert!(!outcome.is_success());
        assert!(outcome.status.contains("invalid or missing PDF file"));
    }

    #[tokio::test]
    async fn missing_prompt_template_fails_before_opening_the_document() {
        // The input exists but is junk; resolution must fail before any PDF
        // parsing is attempted, so the junk content is never touched.
        let tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::fs::write(tmp.path(), b"junk").unwrap();

        let mut store = PromptStore::builtin();
        store.remove(crate::prompts::PromptKind::Full);
        let config = RunConfig::builder()
            .provider(ProviderKind::OpenRouter)
            .api_key("test-key")
            .use_text_layer(true)
            .use_summary(true)
            .summary_model("test-llm")
            .prompts(store)
            .build()
            .unwrap();

        let outcome = convert_pdf_to_markdown(tmp.path(), &config, &NoopProgress).await;
        assert!(!outcome.is_success());
        assert!(outcome.status.contains("missing required prompt templates"));
        assert!(outcome.status.contains("vlm_full"));
    }
}
