//! Document access: open a PDF, render pages, extract text, and materialize
//! single pages as standalone files.
//!
//! All PDF work goes through pdfium. The bindings are process-wide and built
//! with the `thread_safe` feature, so a single lazily-initialised [`Pdfium`]
//! instance serves every operation; documents loaded from it live for as
//! long as their owner keeps them and close exactly once on drop.
//!
//! Per-page operations deliberately return `Option` instead of `Result`: a
//! page that fails to render or export is a recoverable, page-local
//! condition the orchestrator turns into an inline placeholder. Only opening
//! the document itself is fatal to a run.

use crate::config::PageImageFormat;
use crate::error::DescribePdfError;
use image::codecs::jpeg::JpegEncoder;
use once_cell::sync::Lazy;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, error, info, warn};

/// JPEG quality for rendered pages. High enough that text stays legible to
/// a VLM, low enough to keep request bodies small.
const JPEG_QUALITY: u8 = 85;

/// Process-wide pdfium binding, shared by every document handle.
static PDFIUM: Lazy<Pdfium> = Lazy::new(Pdfium::default);

/// A rendered page image ready to be inlined into a provider request.
///
/// Transient: consumed by the next model call and never persisted.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl RenderedImage {
    /// Base64 data URI for providers that embed images in JSON bodies.
    pub fn to_data_uri(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// Bare base64 payload for providers that take image arrays.
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        STANDARD.encode(&self.bytes)
    }
}

/// A single page exported as a standalone one-page PDF.
///
/// The backing temp file is deleted when this value is dropped, which is the
/// cleanup guarantee the orchestrator relies on: whatever happens after the
/// file is created — extraction failure, model abort, panic unwinding — the
/// file is gone by the time the page's scope ends.
#[derive(Debug)]
pub struct SinglePagePdf {
    path: TempPath,
}

impl SinglePagePdf {
    pub(crate) fn from_temp_path(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Capability contract the orchestrator needs from an opened document.
///
/// [`PdfiumDocument`] is the production implementation; tests drive the
/// orchestrator with in-memory fakes.
pub trait DocumentAccess {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render one page (0-based) to image bytes.
    ///
    /// Absent on rendering failure — a per-page recoverable condition.
    fn render_page(
        &self,
        index: usize,
        format: PageImageFormat,
        dpi: u16,
    ) -> Option<RenderedImage>;

    /// Export one page (0-based) as a standalone single-page PDF.
    ///
    /// Absent on failure; the caller must not assume any file exists then.
    fn materialize_page(&self, index: usize) -> Option<SinglePagePdf>;

    /// Extract the plain text of every page, separated by blank lines.
    ///
    /// Opens its own independent document handle and closes it before
    /// returning, regardless of outcome. Absent on failure.
    fn extract_all_text(&self) -> Option<String>;
}

/// An open PDF document backed by pdfium.
///
/// Exclusively owned by the orchestrator for the duration of a run; the
/// underlying pdfium document is released exactly once when this value
/// drops, on every exit path.
pub struct PdfiumDocument {
    doc: PdfDocument<'static>,
    path: PathBuf,
}

impl PdfiumDocument {
    /// Open a PDF file.
    ///
    /// Fails when the file cannot be parsed as a PDF; the caller treats this
    /// as terminal for the run.
    pub fn open(path: &Path) -> Result<Self, DescribePdfError> {
        let doc = PDFIUM.load_pdf_from_file(path, None).map_err(|e| {
            error!("could not open PDF {}: {e:?}", path.display());
            DescribePdfError::UnreadableDocument {
                name: display_name(path),
            }
        })?;
        let opened = Self {
            doc,
            path: path.to_path_buf(),
        };
        info!(
            "opened PDF '{}' with {} pages",
            display_name(path),
            opened.page_count()
        );
        Ok(opened)
    }
}

impl DocumentAccess for PdfiumDocument {
    fn page_count(&self) -> usize {
        self.doc.pages().len() as usize
    }

    fn render_page(
        &self,
        index: usize,
        format: PageImageFormat,
        dpi: u16,
    ) -> Option<RenderedImage> {
        let page = match self.doc.pages().get(index as u16) {
            Ok(page) => page,
            Err(e) => {
                warn!("could not load page {}: {e:?}", index + 1);
                return None;
            }
        };

        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);
        let bitmap = match page.render_with_config(&render_config) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!("rendering failed for page {}: {e:?}", index + 1);
                return None;
            }
        };
        let image = bitmap.as_image();
        debug!(
            "rendered page {} at {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );

        encode_image(&image, format).or_else(|| {
            warn!("image encoding failed for page {}", index + 1);
            None
        })
    }

    fn materialize_page(&self, index: usize) -> Option<SinglePagePdf> {
        let tmp = tempfile::Builder::new()
            .prefix("describepdf_page_")
            .suffix(".pdf")
            .tempfile();
        let temp_path = match tmp {
            Ok(file) => file.into_temp_path(),
            Err(e) => {
                warn!("could not create temp file for page {}: {e}", index + 1);
                return None;
            }
        };

        let result = (|| -> Result<(), PdfiumError> {
            let mut single = PDFIUM.create_new_pdf()?;
            single
                .pages_mut()
                .copy_page_from_document(&self.doc, index as u16, 0)?;
            single.save_to_file(&temp_path)?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                debug!(
                    "saved page {} to temporary PDF {}",
                    index + 1,
                    temp_path.display()
                );
                Some(SinglePagePdf::from_temp_path(temp_path))
            }
            Err(e) => {
                // temp_path drops here, removing the file.
                warn!("could not export page {} as single-page PDF: {e:?}", index + 1);
                None
            }
        }
    }

    fn extract_all_text(&self) -> Option<String> {
        extract_all_text(&self.path)
    }
}

/// Extract the plain text of every page of the PDF at `path`.
///
/// Uses its own short-lived document handle so it can run whether or not the
/// main document is open.
pub fn extract_all_text(path: &Path) -> Option<String> {
    let doc = match PDFIUM.load_pdf_from_file(path, None) {
        Ok(doc) => doc,
        Err(e) => {
            error!("could not open PDF for text extraction: {e:?}");
            return None;
        }
    };

    let mut all_text = String::new();
    for page in doc.pages().iter() {
        match page.text() {
            Ok(text) => {
                all_text.push_str(&text.all());
                all_text.push_str("\n\n");
            }
            Err(e) => {
                warn!("text extraction failed for a page: {e:?}");
            }
        }
    }
    info!(
        "extracted {} characters of text from '{}'",
        all_text.len(),
        display_name(path)
    );
    Some(all_text)
}

fn encode_image(image: &image::DynamicImage, format: PageImageFormat) -> Option<RenderedImage> {
    let mut bytes = Vec::new();
    match format {
        PageImageFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                .ok()?;
        }
        PageImageFormat::Jpeg => {
            // JPEG has no alpha channel; flatten first.
            let rgb = image::DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(
                &mut Cursor::new(&mut bytes),
                JPEG_QUALITY,
            ))
            .ok()?;
        }
    }
    Some(RenderedImage {
        bytes,
        mime_type: format.mime_type(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
