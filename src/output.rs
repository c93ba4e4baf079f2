//! Result types and final Markdown assembly.
//!
//! The formatter here is deliberately dumb: it concatenates the ordered page
//! descriptions into a fixed document shell. Keeping it free of I/O and state
//! makes the output byte-reproducible, which golden-file tests rely on.

use std::time::Duration;

/// The description produced for one selected page, in page order.
///
/// `description` is either genuine model output or one of the standardized
/// inline placeholders recorded when that page's processing degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// 1-based page number in the source document.
    pub page_num: usize,
    /// Markdown description of the page, possibly a placeholder.
    pub description: String,
}

impl PageResult {
    pub fn new(page_num: usize, description: impl Into<String>) -> Self {
        Self {
            page_num,
            description: description.into(),
        }
    }
}

/// Terminal result of a conversion run.
///
/// `status` is always populated, success or failure. Only a present
/// `markdown` indicates a usable document — which may still contain per-page
/// error placeholders on an overall-successful run.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Human-readable terminal status message.
    pub status: String,
    /// The assembled Markdown document, or `None` on total failure.
    pub markdown: Option<String>,
}

impl ConversionOutcome {
    /// Successful outcome with the given elapsed wall-clock time.
    pub fn success(markdown: String, elapsed: Duration) -> Self {
        Self {
            status: format!(
                "Conversion completed successfully in {:.2} seconds.",
                elapsed.as_secs_f64()
            ),
            markdown: Some(markdown),
        }
    }

    /// Failed outcome; the error's display text becomes the status message.
    pub fn failure(error: &crate::error::DescribePdfError) -> Self {
        Self {
            status: format!("Error: {error}"),
            markdown: None,
        }
    }

    /// `true` when a usable Markdown document was produced.
    pub fn is_success(&self) -> bool {
        self.markdown.is_some()
    }
}

/// Assemble the final Markdown document from ordered page descriptions.
///
/// The output shell is fixed:
///
/// ```text
/// # Description of PDF: <filename>
///
/// ## Page <N>
///
/// <description>
///
/// ---
///
/// ```
///
/// repeated per page. An empty description falls back to a literal
/// placeholder so every page section always has a body.
pub fn format_markdown_output(pages: &[PageResult], original_filename: &str) -> String {
    let mut md = format!("# Description of PDF: {original_filename}\n\n");
    for page in pages {
        md.push_str(&format!("## Page {}\n\n", page.page_num));
        if page.description.is_empty() {
            md.push_str("*No description generated for this page.*");
        } else {
            md.push_str(&page.description);
        }
        md.push_str("\n\n---\n\n");
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_page_document_exact_bytes() {
        let pages = vec![
            PageResult::new(1, "Page one content."),
            PageResult::new(2, "Page two content."),
        ];
        let md = format_markdown_output(&pages, "test.pdf");
        assert_eq!(
            md,
            "# Description of PDF: test.pdf\n\n## Page 1\n\nPage one content.\n\n---\n\n## Page 2\n\nPage two content.\n\n---\n\n"
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let pages = vec![
            PageResult::new(1, "Alpha"),
            PageResult::new(3, "Gamma"),
        ];
        let first = format_markdown_output(&pages, "doc.pdf");
        let second = format_markdown_output(&pages, "doc.pdf");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_description_gets_placeholder() {
        let pages = vec![PageResult::new(1, "")];
        let md = format_markdown_output(&pages, "doc.pdf");
        assert!(md.contains("*No description generated for this page.*"));
    }

    #[test]
    fn section_headers_use_source_page_numbers() {
        let pages = vec![
            PageResult::new(1, "a"),
            PageResult::new(3, "b"),
            PageResult::new(7, "c"),
        ];
        let md = format_markdown_output(&pages, "doc.pdf");
        assert!(md.contains("## Page 1\n"));
        assert!(md.contains("## Page 3\n"));
        assert!(md.contains("## Page 7\n"));
        assert!(!md.contains("## Page 2\n"));
    }

    #[test]
    fn failure_outcome_has_no_markdown() {
        let outcome =
            ConversionOutcome::failure(&crate::error::DescribePdfError::MissingApiKey);
        assert!(!outcome.is_success());
        assert!(outcome.status.starts_with("Error: "));
    }
}
