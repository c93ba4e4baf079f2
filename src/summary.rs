//! Whole-document summary generation.
//!
//! The summary is a best-effort enhancement: it runs once per conversion,
//! before any page work, and its result is substituted into every page
//! prompt that asks for `[SUMMARY_CONTEXT]`. Nothing here may abort a run —
//! every failure path collapses into `None`, and the orchestrator simply
//! proceeds without summary context.

use crate::document::DocumentAccess;
use crate::prompts::{PromptKind, RequiredPrompts};
use crate::provider::ModelClient;
use tracing::{error, info, warn};

/// Maximum characters of extracted text substituted into the summary prompt
/// (roughly 128K tokens). Longer documents are truncated with a marker.
const MAX_CHARS_FOR_PROMPT: usize = 512_000;

/// Literal appended when the document text had to be cut.
const TRUNCATION_MARKER: &str = "\n\n[... text truncated ...]";

/// Sentinel summary for documents with no text layer at all; still a valid
/// summary context, so pages keep their summary-variant prompt.
const NO_TEXT_SENTINEL: &str = "Document contains no extractable text.";

/// Generate a whole-document summary, or `None` when any step fails.
pub async fn generate_summary<D, C>(
    doc: &D,
    client: &C,
    model: &str,
    prompts: &RequiredPrompts,
) -> Option<String>
where
    D: DocumentAccess + ?Sized,
    C: ModelClient,
{
    info!("starting summary generation with model {model}");

    let mut full_text = match doc.extract_all_text() {
        Some(text) => text,
        None => {
            error!("failed to extract text for summary");
            return None;
        }
    };

    if full_text.trim().is_empty() {
        warn!("PDF contains no extractable text for summary");
        return Some(NO_TEXT_SENTINEL.to_string());
    }

    let Some(template) = prompts.get(PromptKind::Summary) else {
        error!("summary prompt template not found");
        return None;
    };

    if full_text.len() > MAX_CHARS_FOR_PROMPT {
        warn!(
            "PDF text ({} chars) exceeds limit ({MAX_CHARS_FOR_PROMPT}), truncating for summary",
            full_text.len()
        );
        let mut cut = MAX_CHARS_FOR_PROMPT;
        while !full_text.is_char_boundary(cut) {
            cut -= 1;
        }
        full_text.truncate(cut);
        full_text.push_str(TRUNCATION_MARKER);
    }

    let prompt = template.replace("[FULL_PDF_TEXT]", &full_text);

    match client.summarize(model, &prompt).await {
        Ok(summary) if !summary.trim().is_empty() => {
            info!("summary generated successfully");
            Some(summary)
        }
        Ok(_) => {
            error!("summary call returned no content");
            None
        }
        Err(e) => {
            error!("failed to generate summary: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageImageFormat;
    use crate::document::{RenderedImage, SinglePagePdf};
    use crate::error::ModelError;
    use crate::prompts::PromptStore;
    use std::sync::Mutex;

    struct TextOnlyDoc {
        text: Option<String>,
    }

    impl DocumentAccess for TextOnlyDoc {
        fn page_count(&self) -> usize {
            1
        }
        fn render_page(&self, _: usize, _: PageImageFormat, _: u16) -> Option<RenderedImage> {
            None
        }
        fn materialize_page(&self, _: usize) -> Option<SinglePagePdf> {
            None
        }
        fn extract_all_text(&self) -> Option<String> {
            self.text.clone()
        }
    }

    struct ScriptedClient {
        reply: Result<String, ModelError>,
        prompts_seen: Mutex<Vec<String>>,
    }

    impl ModelClient for ScriptedClient {
        async fn describe_image(
            &self,
            _model: &str,
            _prompt: &str,
            _image: &RenderedImage,
        ) -> Result<String, ModelError> {
            unreachable!("summary generation never describes images")
        }

        async fn summarize(&self, _model: &str, prompt: &str) -> Result<String, ModelError> {
            self.prompts_seen.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn required() -> RequiredPrompts {
        PromptStore::builtin().required_for(false, true).unwrap()
    }

    #[tokio::test]
    async fn happy_path_returns_model_output() {
        let doc = TextOnlyDoc {
            text: Some("Chapter one. Chapter two.".into()),
        };
        let client = ScriptedClient {
            reply: Ok("A two-chapter document.".into()),
            prompts_seen: Mutex::new(Vec::new()),
        };
        let summary = generate_summary(&doc, &client, "qwen2.5", &required()).await;
        assert_eq!(summary.as_deref(), Some("A two-chapter document."));

        let seen = client.prompts_seen.lock().unwrap();
        assert!(seen[0].contains("Chapter one."), "text was substituted");
        assert!(!seen[0].contains("[FULL_PDF_TEXT]"));
    }

    #[tokio::test]
    async fn extraction_failure_is_absent() {
        let doc = TextOnlyDoc { text: None };
        let client = ScriptedClient {
            reply: Ok("unused".into()),
            prompts_seen: Mutex::new(Vec::new()),
        };
        assert!(generate_summary(&doc, &client, "m", &required()).await.is_none());
        assert!(client.prompts_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_text_short_circuits_to_sentinel() {
        let doc = TextOnlyDoc {
            text: Some("   \n\n  ".into()),
        };
        let client = ScriptedClient {
            reply: Ok("unused".into()),
            prompts_seen: Mutex::new(Vec::new()),
        };
        let summary = generate_summary(&doc, &client, "m", &required()).await;
        assert_eq!(summary.as_deref(), Some(NO_TEXT_SENTINEL));
        // The sentinel is produced without a model call.
        assert!(client.prompts_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_error_is_absorbed() {
        let doc = TextOnlyDoc {
            text: Some("content".into()),
        };
        let client = ScriptedClient {
            reply: Err(ModelError::Transport("API error (503): down".into())),
            prompts_seen: Mutex::new(Vec::new()),
        };
        assert!(generate_summary(&doc, &client, "m", &required()).await.is_none());
    }

    #[tokio::test]
    async fn empty_reply_is_absent() {
        let doc = TextOnlyDoc {
            text: Some("content".into()),
        };
        let client = ScriptedClient {
            reply: Ok("  ".into()),
            prompts_seen: Mutex::new(Vec::new()),
        };
        assert!(generate_summary(&doc, &client, "m", &required()).await.is_none());
    }

    #[tokio::test]
    async fn oversized_text_is_truncated_with_marker() {
        let doc = TextOnlyDoc {
            text: Some("a".repeat(MAX_CHARS_FOR_PROMPT + 10_000)),
        };
        let client = ScriptedClient {
            reply: Ok("summary".into()),
            prompts_seen: Mutex::new(Vec::new()),
        };
        generate_summary(&doc, &client, "m", &required()).await;

        let seen = client.prompts_seen.lock().unwrap();
        assert!(seen[0].contains(TRUNCATION_MARKER));
        // Template overhead aside, the substituted text must respect the cap.
        assert!(seen[0].len() < MAX_CHARS_FOR_PROMPT + 1_000);
    }
}
