use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

use super::preprocess::prepare_for_ocr;
use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::config::OcrConfig;

/// Turns one screenshot into raw text.
pub trait TextRecognizer {
    fn recognize(&self, image_path: &Path) -> Result<String>;
}

/// Runs the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
    language: String,
    page_seg_mode: u8,
    binarize_threshold: Option<u8>,
}

impl TesseractCli {
    /// Locates Tesseract according to the OCR config.
    pub fn from_config(config: &OcrConfig) -> Result<Self> {
        let executable = find_tesseract_executable(config.tesseract_path.as_deref())?;
        let tessdata = find_tessdata_dir(&config.language);
        crate::log(&format!("Using Tesseract at: {}", executable.display()));

        Ok(Self {
            executable,
            tessdata,
            language: config.language.clone(),
            page_seg_mode: config.page_seg_mode,
            binarize_threshold: config.binarize_threshold,
        })
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image_path: &Path) -> Result<String> {
        let img = image::open(image_path)
            .context(format!("Failed to load image: {}", image_path.display()))?;
        let prepared = prepare_for_ocr(&img, self.binarize_threshold);

        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        prepared
            .save(temp_input.path())
            .context("Failed to write preprocessed image")?;

        let mut command = Command::new(&self.executable);
        command.arg(temp_input.path()).arg("stdout");
        if let Some(tessdata) = &self.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        let output = command
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.page_seg_mode.to_string())
            .output()
            .context("Failed to run Tesseract")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
