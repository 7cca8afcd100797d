//! Extractor configuration.
//!
//! Loads settings from config.json next to the executable (or an explicit
//! path). Missing sections and fields fall back to defaults, so a partial
//! file only needs to mention what it changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the parsers treat the boundary marker between two images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Keep the active slot/rank across images.
    #[default]
    Persist,
    /// Drop the active slot/rank at every boundary marker.
    Reset,
}

/// Complete extractor configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Line-level parsing rules
    pub parsing: ParsingConfig,
    /// Fuzzy name matching thresholds
    pub matching: MatchingConfig,
    /// Output block layout
    pub output: OutputConfig,
    /// Tesseract invocation
    pub ocr: OcrConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Highest slot/rank number accepted (lowest is always 1)
    pub max_id: u8,
    /// Bare names (no elimination suffix) must be shorter than this
    pub max_bare_name_len: usize,
    /// Whether parser state survives an image boundary
    pub boundary_policy: BoundaryPolicy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Similarity a roster name must exceed to count toward a rank's score
    pub candidate_threshold: f64,
    /// Similarity a result name must exceed to give its kills to a roster name
    pub assignment_threshold: f64,
    /// Fold OCR look-alike digits (0 → o, 1 → l) before comparing names
    pub fold_confusables: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rows emitted per slot in the player and kill blocks
    pub rows_per_slot: usize,
    /// Text written wherever a value is unknown or zero
    pub empty_sentinel: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Explicit path to the tesseract executable
    pub tesseract_path: Option<PathBuf>,
    /// Tesseract language code
    pub language: String,
    /// Tesseract page segmentation mode (3 = fully automatic)
    pub page_seg_mode: u8,
    /// If set, pixels brighter than this on all channels become black text
    pub binarize_threshold: Option<u8>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_id: 60,
            max_bare_name_len: 32,
            boundary_policy: BoundaryPolicy::Persist,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            candidate_threshold: 0.65,
            assignment_threshold: 0.60,
            fold_confusables: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            rows_per_slot: 6,
            empty_sentinel: "\"\"".to_string(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            language: "eng".to_string(),
            page_seg_mode: 3,
            binarize_threshold: None,
        }
    }
}

impl ExtractorConfig {
    /// Load config from file, or return defaults if it is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        crate::log(&format!("Looking for config at: {}", config_path.display()));

        if !config_path.exists() {
            crate::log("config.json not found. Using default config.");
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log(&format!("Config loaded from {}", config_path.display()));
                    config
                }
                Err(e) => {
                    crate::log(&format!("Failed to parse config: {}. Using defaults.", e));
                    Self::default()
                }
            },
            Err(e) => {
                crate::log(&format!("Failed to read config: {}. Using defaults.", e));
                Self::default()
            }
        }
    }

    /// Loads `--config` if given, otherwise config.json next to the executable.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load(&crate::paths::get_exe_dir().join("config.json")),
        }
    }

    /// Save default config to file (for reference).
    pub fn save_default(config_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(config_path, json)
            .context(format!("Failed to write config: {}", config_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.parsing.max_id, 60);
        assert_eq!(config.parsing.boundary_policy, BoundaryPolicy::Persist);
        assert!((config.matching.candidate_threshold - 0.65).abs() < 1e-9);
        assert!((config.matching.assignment_threshold - 0.60).abs() < 1e-9);
        assert_eq!(config.output.rows_per_slot, 6);
        assert_eq!(config.output.empty_sentinel, "\"\"");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "matching": { "candidate_threshold": 0.62 }, "parsing": { "boundary_policy": "reset" } }"#,
        )
        .unwrap();

        let config = ExtractorConfig::load(&path);
        assert!((config.matching.candidate_threshold - 0.62).abs() < 1e-9);
        assert!((config.matching.assignment_threshold - 0.60).abs() < 1e-9);
        assert_eq!(config.parsing.boundary_policy, BoundaryPolicy::Reset);
        assert_eq!(config.parsing.max_id, 60);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = ExtractorConfig::load(&path);
        assert_eq!(config.output.rows_per_slot, 6);
    }

    #[test]
    fn test_save_default_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        ExtractorConfig::save_default(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"boundary_policy\": \"persist\""));

        let config = ExtractorConfig::load(&path);
        assert_eq!(config.ocr.language, "eng");
    }
}
