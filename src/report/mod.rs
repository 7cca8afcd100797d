//! Report building and export.
//!
//! This module provides:
//! - Five-block columnar output with row padding
//! - Block text files, JSON export and raw OCR text dumps

pub mod blocks;
pub mod export;

pub use blocks::MatchOutput;
pub use export::{export_to_json, write_blocks, write_raw_text};

use serde::Serialize;

use crate::matching::ReconciledSlot;

/// Everything one reconciliation run produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchReport {
    /// Per-slot records, ascending and gap-free
    pub slots: Vec<ReconciledSlot>,
    /// The same records flattened into blocks
    pub output: MatchOutput,
}
