//! Prompt templates and feature-dependent prompt resolution.
//!
//! Centralising every template here serves two purposes:
//!
//! 1. **Single source of truth** — changing how pages are described requires
//!    editing exactly one place, and callers can override any template by
//!    pointing [`PromptStore::from_dir`] at a directory of Markdown files.
//!
//! 2. **Fail-fast resolution** — [`PromptStore::required_for`] computes the
//!    exact template subset a run needs and refuses to start when one is
//!    missing, so a misconfigured prompt directory surfaces before any page
//!    is rendered rather than halfway through a long document.
//!
//! Placeholder substitution is literal token replacement, not a templating
//! language: `[PAGE_NUM]`, `[TOTAL_PAGES]`, `[LANGUAGE]`,
//! `[MARKDOWN_CONTEXT]`, `[SUMMARY_CONTEXT]`, and `[FULL_PDF_TEXT]` are
//! matched verbatim and case-sensitively.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{error, info};

/// Identifies one of the five named templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Page description with no extra context.
    Base,
    /// Page description enriched with the page's extracted text layer.
    WithTextLayer,
    /// Page description enriched with the whole-document summary.
    WithSummary,
    /// Page description enriched with both text layer and summary.
    Full,
    /// Whole-document summary generation (text-only call).
    Summary,
}

impl PromptKind {
    /// All five kinds, in load order.
    pub const ALL: [PromptKind; 5] = [
        PromptKind::Base,
        PromptKind::WithTextLayer,
        PromptKind::WithSummary,
        PromptKind::Full,
        PromptKind::Summary,
    ];

    /// Stable identifier used in logs and error messages.
    pub fn key(self) -> &'static str {
        match self {
            PromptKind::Base => "vlm_base",
            PromptKind::WithTextLayer => "vlm_text_layer",
            PromptKind::WithSummary => "vlm_summary",
            PromptKind::Full => "vlm_full",
            PromptKind::Summary => "summary",
        }
    }

    /// File name looked up by [`PromptStore::from_dir`].
    pub fn file_name(self) -> &'static str {
        match self {
            PromptKind::Base => "vlm_prompt_base.md",
            PromptKind::WithTextLayer => "vlm_prompt_with_text_layer.md",
            PromptKind::WithSummary => "vlm_prompt_with_summary.md",
            PromptKind::Full => "vlm_prompt_full.md",
            PromptKind::Summary => "summary_prompt.md",
        }
    }

    /// Select the page-description variant for one page, keyed on which
    /// context enhancements were actually produced (not merely requested).
    pub fn for_page(has_text_layer: bool, has_summary: bool) -> PromptKind {
        match (has_text_layer, has_summary) {
            (true, true) => PromptKind::Full,
            (true, false) => PromptKind::WithTextLayer,
            (false, true) => PromptKind::WithSummary,
            (false, false) => PromptKind::Base,
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            PromptKind::Base => BASE_PROMPT,
            PromptKind::WithTextLayer => WITH_TEXT_LAYER_PROMPT,
            PromptKind::WithSummary => WITH_SUMMARY_PROMPT,
            PromptKind::Full => FULL_PROMPT,
            PromptKind::Summary => SUMMARY_PROMPT,
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Built-in templates ───────────────────────────────────────────────────

const BASE_PROMPT: &str = r#"You are describing one page of a PDF document for a reader who cannot see it.

This is page [PAGE_NUM] of [TOTAL_PAGES]. Look at the attached page image and write a detailed, faithful description of everything on it: the text content, headings, tables, figures, diagrams, and layout. Transcribe text accurately, summarise figures and images, and render tabular data as Markdown tables where practical.

Write the description in [LANGUAGE]. Output only the description as Markdown, with no preamble and no commentary about this task."#;

const WITH_TEXT_LAYER_PROMPT: &str = r#"You are describing one page of a PDF document for a reader who cannot see it.

This is page [PAGE_NUM] of [TOTAL_PAGES]. Look at the attached page image and write a detailed, faithful description of everything on it: the text content, headings, tables, figures, diagrams, and layout. Transcribe text accurately, summarise figures and images, and render tabular data as Markdown tables where practical.

The following text was extracted from this page's text layer. Use it to correct your reading of small or unclear print, but trust the image for layout and anything the extraction missed:

[MARKDOWN_CONTEXT]

Write the description in [LANGUAGE]. Output only the description as Markdown, with no preamble and no commentary about this task."#;

const WITH_SUMMARY_PROMPT: &str = r#"You are describing one page of a PDF document for a reader who cannot see it.

This is page [PAGE_NUM] of [TOTAL_PAGES]. Look at the attached page image and write a detailed, faithful description of everything on it: the text content, headings, tables, figures, diagrams, and layout. Transcribe text accurately, summarise figures and images, and render tabular data as Markdown tables where practical.

For context, here is a summary of the whole document:

[SUMMARY_CONTEXT]

Write the description in [LANGUAGE]. Output only the description as Markdown, with no preamble and no commentary about this task."#;

const FULL_PROMPT: &str = r#"You are describing one page of a PDF document for a reader who cannot see it.

This is page [PAGE_NUM] of [TOTAL_PAGES]. Look at the attached page image and write a detailed, faithful description of everything on it: the text content, headings, tables, figures, diagrams, and layout. Transcribe text accurately, summarise figures and images, and render tabular data as Markdown tables where practical.

For context, here is a summary of the whole document:

[SUMMARY_CONTEXT]

The following text was extracted from this page's text layer. Use it to correct your reading of small or unclear print, but trust the image for layout and anything the extraction missed:

[MARKDOWN_CONTEXT]

Write the description in [LANGUAGE]. Output only the description as Markdown, with no preamble and no commentary about this task."#;

const SUMMARY_PROMPT: &str = r#"The text below is the full extracted content of a PDF document. Write a concise summary (a few paragraphs at most) covering what the document is, its main topics, and its overall structure. Output only the summary.

[FULL_PDF_TEXT]"#;

// ── Store and resolution ─────────────────────────────────────────────────

/// Holds the loaded prompt templates, keyed by [`PromptKind`].
///
/// Construct with [`PromptStore::builtin`] for the compiled-in defaults or
/// [`PromptStore::from_dir`] to load overrides from disk. A file missing
/// from the directory simply leaves that kind absent; whether that matters
/// is decided later by [`PromptStore::required_for`].
#[derive(Debug, Clone)]
pub struct PromptStore {
    templates: HashMap<PromptKind, String>,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptStore {
    /// Store containing the five compiled-in default templates.
    pub fn builtin() -> Self {
        let templates = PromptKind::ALL
            .iter()
            .map(|&kind| (kind, kind.builtin().to_string()))
            .collect();
        Self { templates }
    }

    /// Empty store; useful when every template must come from elsewhere.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Load templates from a directory using the fixed file names.
    ///
    /// Unreadable or missing files leave that template absent (logged, not
    /// fatal here — resolution decides whether the run can proceed).
    pub fn from_dir(dir: &Path) -> Self {
        let mut templates = HashMap::new();
        for &kind in &PromptKind::ALL {
            let path = dir.join(kind.file_name());
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    templates.insert(kind, text);
                }
                Err(e) => {
                    error!("could not read prompt file {}: {e}", path.display());
                }
            }
        }
        info!("loaded {} prompt templates from {}", templates.len(), dir.display());
        Self { templates }
    }

    /// Insert or replace a single template.
    pub fn set(&mut self, kind: PromptKind, template: impl Into<String>) {
        self.templates.insert(kind, template.into());
    }

    /// Remove a template; mainly useful for testing resolution failures.
    pub fn remove(&mut self, kind: PromptKind) {
        self.templates.remove(&kind);
    }

    pub fn get(&self, kind: PromptKind) -> Option<&str> {
        self.templates.get(&kind).map(String::as_str)
    }

    /// Resolve the template subset the requested feature set needs.
    ///
    /// `base` is always required; the variant matching the requested
    /// combination is added on top, and the standalone `summary` template is
    /// required whenever summaries are requested at all. Returns the missing
    /// keys on failure so the caller can fail fast before any page work.
    pub fn required_for(
        &self,
        use_text_layer: bool,
        use_summary: bool,
    ) -> Result<RequiredPrompts, Vec<&'static str>> {
        let mut required = vec![PromptKind::Base];
        match (use_text_layer, use_summary) {
            (true, true) => required.push(PromptKind::Full),
            (true, false) => required.push(PromptKind::WithTextLayer),
            (false, true) => required.push(PromptKind::WithSummary),
            (false, false) => {}
        }
        if use_summary {
            required.push(PromptKind::Summary);
        }

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|&&kind| !self.templates.contains_key(&kind))
            .map(|&kind| kind.key())
            .collect();
        if !missing.is_empty() {
            error!("missing required prompt templates: {}", missing.join(", "));
            return Err(missing);
        }

        let map = required
            .into_iter()
            .map(|kind| (kind, self.templates[&kind].clone()))
            .collect();
        Ok(RequiredPrompts { map })
    }
}

/// The resolved, validated template subset for one run.
///
/// Pages may still select a variant outside this subset when a requested
/// enhancement fails for only some pages (e.g. text layer and summary both
/// requested, but the text layer fails on one page — that page would want
/// the summary-only variant, which was never required). Such lookups return
/// `None` and the page records a placeholder instead of aborting the run.
#[derive(Debug, Clone)]
pub struct RequiredPrompts {
    map: HashMap<PromptKind, String>,
}

impl RequiredPrompts {
    pub fn get(&self, kind: PromptKind) -> Option<&str> {
        self.map.get(&kind).map(String::as_str)
    }
}

/// Fill a page-description template by literal token replacement.
///
/// The context tokens are only substituted when actually present in the
/// chosen template; an absent context value substitutes the literal `"N/A"`.
pub fn fill_page_prompt(
    template: &str,
    page_num: usize,
    total_pages: usize,
    language: &str,
    text_context: Option<&str>,
    summary_context: Option<&str>,
) -> String {
    let mut prompt = template
        .replace("[PAGE_NUM]", &page_num.to_string())
        .replace("[TOTAL_PAGES]", &total_pages.to_string())
        .replace("[LANGUAGE]", language);
    if prompt.contains("[MARKDOWN_CONTEXT]") {
        prompt = prompt.replace("[MARKDOWN_CONTEXT]", text_context.unwrap_or("N/A"));
    }
    if prompt.contains("[SUMMARY_CONTEXT]") {
        prompt = prompt.replace("[SUMMARY_CONTEXT]", summary_context.unwrap_or("N/A"));
    }
    prompt
}
