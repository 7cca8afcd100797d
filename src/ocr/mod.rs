pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::{TesseractCli, TextRecognizer};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Returns true if the path has an image extension the decoder understands.
pub fn is_image_path(path: &Path) -> bool {
    image::ImageFormat::from_path(path).is_ok()
}

/// Drops non-image paths and repeats, keeping first-seen order.
pub fn filter_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::new();
    for path in paths {
        if !is_image_path(path) {
            crate::log(&format!("Skipping non-image file: {}", path.display()));
            continue;
        }
        if kept.contains(path) {
            continue;
        }
        kept.push(path.clone());
    }
    kept
}

/// OCRs each image in order. `label` only appears in progress log lines.
///
/// The first failure aborts the batch.
pub fn recognize_all(
    recognizer: &dyn TextRecognizer,
    paths: &[PathBuf],
    label: &str,
) -> Result<Vec<String>> {
    let mut texts = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        crate::log(&format!(
            "Reading {} image {} of {}: {}",
            label,
            i + 1,
            paths.len(),
            path.display()
        ));
        let text = recognizer
            .recognize(path)
            .context(format!("OCR failed for {}", path.display()))?;
        texts.push(text);
    }
    Ok(texts)
}
