use std::io::Cursor;
use std::sync::Arc;

use crate::error::ExtractError;

/// One piece of recognized text. Engines that report layout fill in the
/// confidence and bounding box; the pipeline only consumes `text`.
#[derive(Debug, Clone)]
pub struct OcrFragment {
    pub text: String,
    pub confidence: f32,
    /// `[x, y, width, height]` in image pixels, if the engine reports one.
    pub bounding_box: Option<[u32; 4]>,
}

pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_data: &[u8]) -> Result<Vec<OcrFragment>, ExtractError>;
}

#[derive(Clone)]
pub struct TesseractOcr {
    inner: Arc<TesseractOcrInner>,
}

struct TesseractOcrInner {
    languages: String,
}

impl TesseractOcr {
    pub fn new(languages: &[String]) -> Self {
        let lang_str = if languages.is_empty() {
            "eng".to_string()
        } else {
            languages.join("+")
        };

        Self {
            inner: Arc::new(TesseractOcrInner { languages: lang_str }),
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_data: &[u8]) -> Result<Vec<OcrFragment>, ExtractError> {
        let _span = tracing::info_span!("extractor.ocr").entered();

        let img = image::load_from_memory(image_data)
            .map_err(|e| ExtractError::Ocr(format!("Failed to load image: {}", e)))?;

        // Normalize to PNG in memory for leptess
        let mut png_data = Vec::new();
        let mut cursor = Cursor::new(&mut png_data);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| ExtractError::Ocr(format!("Failed to convert image: {}", e)))?;

        let mut lt = leptess::LepTess::new(None, &self.inner.languages)
            .map_err(|e| ExtractError::Ocr(format!("Failed to initialize Tesseract: {}", e)))?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ExtractError::Ocr(format!("Failed to set image for OCR: {}", e)))?;

        let text = lt
            .get_utf8_text()
            .map_err(|e| ExtractError::Ocr(format!("OCR failed: {}", e)))?;
        let confidence = lt.mean_text_conf() as f32 / 100.0;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![OcrFragment {
            text,
            confidence,
            bounding_box: None,
        }])
    }
}
