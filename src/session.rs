//! One extraction run.
//!
//! A `MatchSession` collects the OCR text of every screenshot submitted for a
//! match, labelled lobby or result, and turns it into a report. Nothing is
//! kept between sessions.

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use crate::config::ExtractorConfig;
use crate::matching::{NameMatcher, reconcile};
use crate::ocr::{self, TextRecognizer};
use crate::parse::{DocumentKind, LobbyParser, ResultParser, classify_document, join_images};
use crate::report::{MatchOutput, MatchReport};

pub const NO_SLOTS_MESSAGE: &str =
    "Could not detect any slot numbers. Check raw OCR text and re-parse manually.";

#[derive(Debug, Default)]
pub struct MatchSession {
    lobby_texts: Vec<String>,
    result_texts: Vec<String>,
    skipped: usize,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one image's text under a known label. `Unknown` texts are dropped.
    pub fn add_text(&mut self, kind: DocumentKind, text: String) {
        match kind {
            DocumentKind::Lobby => self.lobby_texts.push(text),
            DocumentKind::Result => self.result_texts.push(text),
            DocumentKind::Unknown => self.skipped += 1,
        }
    }

    /// Labels an unlabelled text with the document classifier, then adds it.
    pub fn add_unlabelled(&mut self, text: String) -> DocumentKind {
        let kind = classify_document(&text);
        self.add_text(kind, text);
        kind
    }

    /// OCRs labelled and unlabelled screenshots in submission order:
    /// lobby images, then result images, then unlabelled ones.
    pub fn from_images(
        recognizer: &dyn TextRecognizer,
        lobby: &[PathBuf],
        result: &[PathBuf],
        unlabelled: &[PathBuf],
    ) -> Result<Self> {
        let mut session = Self::new();

        for text in ocr::recognize_all(recognizer, &ocr::filter_images(lobby), "lobby")? {
            session.add_text(DocumentKind::Lobby, text);
        }
        for text in ocr::recognize_all(recognizer, &ocr::filter_images(result), "result")? {
            session.add_text(DocumentKind::Result, text);
        }

        let unlabelled = ocr::filter_images(unlabelled);
        let texts = ocr::recognize_all(recognizer, &unlabelled, "unlabelled")?;
        for (path, text) in unlabelled.iter().zip(texts) {
            let kind = session.add_unlabelled(text);
            match kind {
                DocumentKind::Unknown => crate::log(&format!(
                    "Warning: could not tell whether {} is a lobby or result screen, skipping",
                    path.display()
                )),
                _ => crate::log(&format!("Classified {} as {}", path.display(), kind)),
            }
        }

        Ok(session)
    }

    /// All lobby texts joined with boundary markers.
    pub fn lobby_text(&self) -> String {
        join_images(&self.lobby_texts)
    }

    /// All result texts joined with boundary markers.
    pub fn result_text(&self) -> String {
        join_images(&self.result_texts)
    }

    pub fn lobby_count(&self) -> usize {
        self.lobby_texts.len()
    }

    pub fn result_count(&self) -> usize {
        self.result_texts.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn build_report(&self, config: &ExtractorConfig) -> Result<MatchReport> {
        build_report(&self.lobby_text(), &self.result_text(), config)
    }
}

/// Parses both streams, reconciles them and flattens the result.
///
/// Fails only when the lobby text holds no slot number at all.
pub fn build_report(
    lobby_text: &str,
    result_text: &str,
    config: &ExtractorConfig,
) -> Result<MatchReport> {
    crate::log("Parsing lobby data...");
    let slots = LobbyParser::new(&config.parsing)?.parse(lobby_text);

    crate::log("Parsing result data...");
    let ranks = ResultParser::new(&config.parsing)?.parse(result_text);

    crate::log("Cross-referencing & building output...");
    let matcher = NameMatcher::new(&config.matching);
    let reconciled = reconcile(&slots, &ranks, &matcher);
    if reconciled.is_empty() {
        return Err(anyhow!(NO_SLOTS_MESSAGE));
    }

    let output = MatchOutput::from_slots(&reconciled, &config.output);
    crate::log(&output.summary.summary_line());

    Ok(MatchReport {
        slots: reconciled,
        output,
    })
}
