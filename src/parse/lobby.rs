//! Lobby screen parser.
//!
//! The lobby lists teams as a slot number followed by up to six player lines,
//! each ending in "/0 Eliminations". OCR merges the number into the first name,
//! drops the suffix, or splits a team across two screenshots, so the scan is a
//! small state machine fed one classified line at a time.

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use super::lines::{NameCleaner, is_boundary, is_purely_numeric, parse_id, split_lines};
use crate::config::{BoundaryPolicy, ParsingConfig};
use crate::matching::normalize_name;

/// Most players a slot can hold.
pub const MAX_ROSTER_SIZE: usize = 6;

pub type SlotNumber = u8;

/// All rosters seen in a lobby stream, keyed by slot number.
pub type SlotMap = BTreeMap<SlotNumber, Roster>;

/// Lobby headers, dropped before slot detection: "58 Remaining", "Team 3".
const HEADER_PATTERN: &str = r"(?i)^(?:\d{1,2}\s+remaining\b|team\s+\d{1,2}$)";

/// UI text that never names a player. Only checked against bare-name candidates,
/// since real names may contain these words.
const NOISE_PATTERN: &str = r"(?i)remaining|team\s+\d|stage|match\s+start";

/// "/0 Elim..." anywhere in the line, allowing OCR's o-for-zero.
const ELIMINATION_MARKER_PATTERN: &str = r"(?i)/[0o]\s*elim";

/// Slot number followed by text on the same line, e.g. "06 REharshOG /0 Eliminations".
const SLOT_WITH_TEXT_PATTERN: &str = r"^(\d{1,2})\s+(.*)$";

/// Ordered, duplicate-free list of at most six player names.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a name unless the roster is full or already holds it
    /// (compared case- and punctuation-insensitively).
    ///
    /// Names with no ASCII letters or digits all normalize to the empty key,
    /// so only the first of them is kept.
    ///
    /// Returns true if the name was added.
    pub fn push(&mut self, name: &str) -> bool {
        if self.names.len() >= MAX_ROSTER_SIZE {
            return false;
        }
        let key = normalize_name(name);
        if self.names.iter().any(|n| normalize_name(n) == key) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Roster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for name in iter {
            roster.push(name.as_ref());
        }
        roster
    }
}

/// Lobby scanner states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LobbyState {
    /// No slot number seen yet (or dropped at an image boundary)
    NoActiveSlot,
    /// Names go to this slot
    ActiveSlot(SlotNumber),
}

/// What a single lobby line means, independent of parser state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LobbyLine {
    /// Marker between two screenshots
    Boundary,
    /// Screen furniture: "58 Remaining", "Team 3", "Stage", "Match start"
    Noise,
    /// A slot number on its own line
    SlotNumber(SlotNumber),
    /// A slot number with the first player's name (possibly empty after cleanup)
    SlotWithName(SlotNumber, Option<String>),
    /// A name carrying the "/0 Eliminations" suffix
    EliminationEntry(String),
    /// A short line that is probably a name whose suffix OCR dropped
    BareName(String),
    /// Anything else
    Unrecognized,
}

/// Parses lobby OCR text into slot rosters.
pub struct LobbyParser {
    config: ParsingConfig,
    cleaner: NameCleaner,
    header: Regex,
    noise: Regex,
    elimination_marker: Regex,
    slot_with_text: Regex,
}

impl LobbyParser {
    pub fn new(config: &ParsingConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            cleaner: NameCleaner::new()?,
            header: Regex::new(HEADER_PATTERN)?,
            noise: Regex::new(NOISE_PATTERN)?,
            elimination_marker: Regex::new(ELIMINATION_MARKER_PATTERN)?,
            slot_with_text: Regex::new(SLOT_WITH_TEXT_PATTERN)?,
        })
    }

    /// Classifies one trimmed, non-empty line.
    pub fn classify_line(&self, line: &str) -> LobbyLine {
        if is_boundary(line) {
            return LobbyLine::Boundary;
        }
        if self.header.is_match(line) {
            return LobbyLine::Noise;
        }
        if let Some(slot) = parse_id(line, self.config.max_id) {
            return LobbyLine::SlotNumber(slot);
        }

        if let Some(caps) = self.slot_with_text.captures(line) {
            if let Some(slot) = parse_id(&caps[1], self.config.max_id) {
                let rest = self.cleaner.strip_elimination_suffix(&caps[2]);
                let name = if rest.chars().count() > 1
                    && !rest.to_lowercase().starts_with("elimination")
                {
                    Some(self.cleaner.clean(&rest)).filter(|n| n.chars().count() > 1)
                } else {
                    None
                };
                return LobbyLine::SlotWithName(slot, name);
            }
        }

        if self.elimination_marker.is_match(line) {
            let name = self.cleaner.clean(line);
            if name.chars().count() > 1 {
                return LobbyLine::EliminationEntry(name);
            }
            return LobbyLine::Unrecognized;
        }

        if self.noise.is_match(line) {
            return LobbyLine::Noise;
        }

        let name = self.cleaner.clean(line);
        let len = name.chars().count();
        if len > 1
            && len < self.config.max_bare_name_len
            && !is_purely_numeric(&name)
            && !name.to_lowercase().contains("elimination")
        {
            return LobbyLine::BareName(name);
        }

        LobbyLine::Unrecognized
    }

    /// Applies one classified line to the slot map and returns the next state.
    fn transition(&self, state: LobbyState, line: LobbyLine, slots: &mut SlotMap) -> LobbyState {
        match (state, line) {
            (_, LobbyLine::Boundary) => match self.config.boundary_policy {
                BoundaryPolicy::Persist => state,
                BoundaryPolicy::Reset => LobbyState::NoActiveSlot,
            },
            (_, LobbyLine::SlotNumber(slot)) => {
                slots.entry(slot).or_default();
                LobbyState::ActiveSlot(slot)
            }
            (_, LobbyLine::SlotWithName(slot, name)) => {
                let roster = slots.entry(slot).or_default();
                if let Some(name) = name {
                    roster.push(&name);
                }
                LobbyState::ActiveSlot(slot)
            }
            (
                LobbyState::ActiveSlot(slot),
                LobbyLine::EliminationEntry(name) | LobbyLine::BareName(name),
            ) => {
                slots.entry(slot).or_default().push(&name);
                state
            }
            (_, LobbyLine::Noise | LobbyLine::Unrecognized)
            | (
                LobbyState::NoActiveSlot,
                LobbyLine::EliminationEntry(_) | LobbyLine::BareName(_),
            ) => state,
        }
    }

    /// Scans the whole lobby stream. Never fails; unreadable lines are skipped.
    pub fn parse(&self, text: &str) -> SlotMap {
        let mut slots = SlotMap::new();
        let mut state = LobbyState::NoActiveSlot;

        for line in split_lines(text) {
            let classified = self.classify_line(line);
            state = self.transition(state, classified, &mut slots);
        }

        crate::log(&format!(
            "Lobby parse: {} slots, {} players",
            slots.len(),
            slots.values().map(Roster::len).sum::<usize>()
        ));

        slots
    }
}
