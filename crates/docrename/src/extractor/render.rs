use std::path::Path;
use std::process::Command;

use crate::error::ExtractError;

/// Renders document pages to bitmap images for OCR.
pub trait PageRenderer: Send + Sync {
    /// Returns one encoded image per page, in page order.
    fn render_pages(&self, path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, ExtractError>;
}

/// Renders via pdftoppm (poppler-utils), one PNG per page.
pub struct PopplerRenderer;

impl PageRenderer for PopplerRenderer {
    fn render_pages(&self, path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, ExtractError> {
        let _span = tracing::info_span!("extractor.render").entered();

        let out_dir = std::env::temp_dir().join(format!("docrename_render_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| ExtractError::Render(format!("Failed to create temp directory: {}", e)))?;

        let result = render_into(path, dpi, &out_dir);
        let _ = std::fs::remove_dir_all(&out_dir);
        result
    }
}

fn render_into(path: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<Vec<u8>>, ExtractError> {
    let prefix = out_dir.join("page");

    let output = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi.to_string()])
        .arg(path)
        .arg(&prefix)
        .output()
        .map_err(|e| {
            ExtractError::Render(format!(
                "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                e
            ))
        })?;

    if !output.status.success() {
        return Err(ExtractError::Render(format!(
            "pdftoppm failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    // pdftoppm writes page-<n>.png, zero-padding <n> uniformly within a run,
    // so a lexicographic sort restores page order.
    let mut page_files: Vec<_> = std::fs::read_dir(out_dir)
        .map_err(|e| ExtractError::Render(format!("Failed to list rendered pages: {}", e)))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
        .collect();
    page_files.sort();

    let mut pages = Vec::with_capacity(page_files.len());
    for file in page_files {
        let data = std::fs::read(&file)
            .map_err(|e| ExtractError::Render(format!("Failed to read rendered page: {}", e)))?;
        pages.push(data);
    }

    Ok(pages)
}
