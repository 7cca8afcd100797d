//! OCR text parsing.
//!
//! This module provides:
//! - Document classification (lobby vs result screenshot)
//! - Lobby parsing into slot rosters
//! - Result parsing into rank groups with kill counts
//! - Shared line helpers (boundary marker, name cleanup)

pub mod classify;
pub mod lines;
pub mod lobby;
pub mod result;

pub use classify::{DocumentKind, classify_document};
pub use lines::join_images;
pub use lobby::{LobbyParser, SlotMap, SlotNumber};
pub use result::{RankMap, RankNumber, ResultParser};
