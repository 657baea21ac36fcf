pub mod ocr;
pub mod pdf;
pub mod render;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::sanitize;

pub use ocr::{OcrEngine, OcrFragment, TesseractOcr};
pub use render::{PageRenderer, PopplerRenderer};

/// Native text shorter than this (trimmed) is treated as a scanned document
/// and discarded in favor of OCR.
pub const MIN_NATIVE_TEXT_CHARS: usize = 20;

pub struct Extractor {
    renderer: Box<dyn PageRenderer>,
    ocr: Box<dyn OcrEngine>,
    dpi: u32,
}

impl Extractor {
    /// Production constructor — pdftoppm rendering, Tesseract OCR.
    pub fn new(ocr_languages: &[String], dpi: u32) -> Self {
        Self::with_services(
            Box::new(PopplerRenderer),
            Box::new(TesseractOcr::new(ocr_languages)),
            dpi,
        )
    }

    /// Constructor with injected rendering/OCR services.
    pub fn with_services(
        renderer: Box<dyn PageRenderer>,
        ocr: Box<dyn OcrEngine>,
        dpi: u32,
    ) -> Self {
        Self { renderer, ocr, dpi }
    }

    /// Produces raw text for a document: the native text layer when it looks
    /// real, otherwise per-page OCR. Empty output is not an error — only an
    /// unreadable or structurally broken file is.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let _span = tracing::info_span!("extractor", file = %sanitize::redact_path(path)).entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ExtractError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = lopdf::Document::load_mem(&pdf_bytes).map_err(|e| ExtractError::ParseDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let text = pdf::native_text(&doc);
        if text.trim().chars().count() >= MIN_NATIVE_TEXT_CHARS {
            debug!("Using native text layer ({} chars)", text.len());
            return Ok(text);
        }

        let _fallback = tracing::info_span!("extractor.ocr_fallback").entered();
        debug!("Native text below threshold, running OCR");
        self.ocr_document(path)
    }

    /// Renders every page and OCRs them independently. Fragments within a
    /// page are joined with a space, pages with a blank line.
    fn ocr_document(&self, path: &Path) -> Result<String, ExtractError> {
        let pages = self.renderer.render_pages(path, self.dpi)?;

        let mut page_texts = Vec::with_capacity(pages.len());
        for (index, image_data) in pages.iter().enumerate() {
            match self.ocr.recognize(image_data) {
                Ok(fragments) => {
                    let page_text = fragments
                        .iter()
                        .map(|f| f.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    page_texts.push(page_text);
                }
                Err(e) => {
                    warn!("OCR failed on page {}: {}", index + 1, e);
                }
            }
        }

        Ok(page_texts.join("\n\n"))
    }
}
