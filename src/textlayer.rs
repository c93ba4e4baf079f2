//! Text-layer extraction for per-page prompt context.
//!
//! Given a single page materialized as a standalone PDF, pull out its
//! textual content so the VLM gets a transcription hint alongside the page
//! image. The context is purely additive: every failure here — a scanned
//! page with no text layer, a parser error, even a panic inside the
//! extraction library — degrades to "no context for this page" and must
//! never reach the orchestrator as an error.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// Extract the text content of a single-page PDF.
///
/// Returns `None` when the file has no extractable text or extraction fails
/// for any reason. Whitespace-only output counts as no text.
pub fn extract_page_text(single_page_pdf: &Path) -> Option<String> {
    if !single_page_pdf.exists() {
        warn!(
            "single-page PDF not found: {}",
            single_page_pdf.display()
        );
        return None;
    }

    // pdf-extract is known to panic on some malformed inputs; contain that
    // here so one odd page cannot take down the run.
    let extracted = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text(single_page_pdf)
    }));

    match extracted {
        Ok(Ok(text)) => {
            if text.trim().is_empty() {
                debug!("no text layer on {}", single_page_pdf.display());
                None
            } else {
                debug!(
                    "extracted {} characters from {}",
                    text.len(),
                    single_page_pdf.display()
                );
                Some(text)
            }
        }
        Ok(Err(e)) => {
            warn!(
                "text extraction failed for {}: {e}",
                single_page_pdf.display()
            );
            None
        }
        Err(_) => {
            warn!(
                "text extraction panicked for {}",
                single_page_pdf.display()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_absent() {
        assert!(extract_page_text(Path::new("/definitely/not/a/file.pdf")).is_none());
    }

    #[test]
    fn garbage_file_is_absent_not_a_panic() {
        let tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::fs::write(tmp.path(), b"this is not a pdf at all").unwrap();
        assert!(extract_page_text(tmp.path()).is_none());
    }
}
