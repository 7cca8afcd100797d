//! Result screen parser.
//!
//! Each team block on the result screen is a rank number followed by
//! "<player> <n> finishes" lines. The winning team's panel has no "1" label,
//! so kill lines seen before any rank number belong to rank 1.

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use super::lines::{NameCleaner, is_boundary, is_purely_numeric, parse_id, split_lines};
use crate::config::{BoundaryPolicy, ParsingConfig};

pub type RankNumber = u8;

/// All rank groups seen in a result stream, keyed by rank.
pub type RankMap = BTreeMap<RankNumber, RankEntry>;

/// "PlayerName 5 finishes"
const KILL_AFTER_NAME_PATTERN: &str = r"(?i)^(.+?)\s+(\d+)\s+finish(?:es)?";

/// "5 finishes PlayerName" (OCR occasionally reorders the columns)
const KILL_BEFORE_NAME_PATTERN: &str = r"(?i)^(\d+)\s+finish(?:es)?\s+(.+)$";

/// "0 finishes" with the name lost to another line
const KILL_ONLY_PATTERN: &str = r"(?i)^(\d+)\s+finish(?:es)?$";

const NOISE_PATTERN: &str = r"(?i)continue|^stage";

/// Players of one rank with their kill counts, index-aligned.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RankEntry {
    players: Vec<String>,
    kills: Vec<u32>,
}

impl RankEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one player line. Players and kills always grow together.
    pub fn record(&mut self, player: &str, kills: u32) {
        self.players.push(player.to_string());
        self.kills.push(kills);
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn kills(&self) -> &[u32] {
        &self.kills
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for RankEntry {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut entry = RankEntry::new();
        for (player, kills) in iter {
            entry.record(player.as_ref(), kills);
        }
        entry
    }
}

/// Result scanner states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultState {
    NoActiveRank,
    ActiveRank(RankNumber),
}

/// What a single result line means, independent of parser state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultLine {
    Boundary,
    /// "Tap to continue", "Stage ..."
    Noise,
    RankNumber(RankNumber),
    Kill { player: String, kills: u32 },
    /// A kill count whose player name was not recoverable
    UnnamedKill,
    Unrecognized,
}

/// Parses result OCR text into rank groups.
pub struct ResultParser {
    config: ParsingConfig,
    cleaner: NameCleaner,
    noise: Regex,
    kill_after_name: Regex,
    kill_before_name: Regex,
    kill_only: Regex,
}

impl ResultParser {
    pub fn new(config: &ParsingConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            cleaner: NameCleaner::new()?,
            noise: Regex::new(NOISE_PATTERN)?,
            kill_after_name: Regex::new(KILL_AFTER_NAME_PATTERN)?,
            kill_before_name: Regex::new(KILL_BEFORE_NAME_PATTERN)?,
            kill_only: Regex::new(KILL_ONLY_PATTERN)?,
        })
    }

    /// Builds a kill line, rejecting names that cleaned down to nothing or to digits.
    fn kill_line(&self, raw_name: &str, raw_kills: &str) -> ResultLine {
        let Ok(kills) = raw_kills.parse::<u32>() else {
            return ResultLine::Unrecognized;
        };
        let player = self.cleaner.clean(raw_name);
        if player.is_empty() || is_purely_numeric(&player) {
            return ResultLine::UnnamedKill;
        }
        ResultLine::Kill { player, kills }
    }

    /// Classifies one trimmed, non-empty line.
    pub fn classify_line(&self, line: &str) -> ResultLine {
        if is_boundary(line) {
            return ResultLine::Boundary;
        }
        if self.noise.is_match(line) {
            return ResultLine::Noise;
        }
        if let Some(rank) = parse_id(line, self.config.max_id) {
            return ResultLine::RankNumber(rank);
        }
        if self.kill_only.is_match(line) {
            return ResultLine::UnnamedKill;
        }
        if let Some(caps) = self.kill_after_name.captures(line) {
            return self.kill_line(&caps[1], &caps[2]);
        }
        if let Some(caps) = self.kill_before_name.captures(line) {
            return self.kill_line(&caps[2], &caps[1]);
        }
        ResultLine::Unrecognized
    }

    /// Scans the whole result stream. Never fails; unreadable lines are skipped.
    pub fn parse(&self, text: &str) -> RankMap {
        let mut scan = ResultScan::new(self.config.boundary_policy);

        for line in split_lines(text) {
            let classified = self.classify_line(line);
            scan.apply(classified);
        }

        crate::log(&format!(
            "Result parse: {} ranks ({} empty), {} players, {} unnamed kill lines dropped",
            scan.ranks.len(),
            scan.ranks.values().filter(|r| r.is_empty()).count(),
            scan.ranks.values().map(RankEntry::len).sum::<usize>(),
            scan.dropped
        ));

        scan.ranks
    }
}

/// Mutable state of one result scan.
struct ResultScan {
    policy: BoundaryPolicy,
    state: ResultState,
    rank_one_seen: bool,
    ranks: RankMap,
    dropped: usize,
}

impl ResultScan {
    fn new(policy: BoundaryPolicy) -> Self {
        Self {
            policy,
            state: ResultState::NoActiveRank,
            rank_one_seen: false,
            ranks: RankMap::new(),
            dropped: 0,
        }
    }

    fn apply(&mut self, line: ResultLine) {
        self.state = match (self.state, line) {
            (state, ResultLine::Boundary) => match self.policy {
                BoundaryPolicy::Persist => state,
                BoundaryPolicy::Reset => ResultState::NoActiveRank,
            },
            (_, ResultLine::RankNumber(rank)) => {
                self.ranks.entry(rank).or_default();
                if rank == 1 {
                    self.rank_one_seen = true;
                }
                ResultState::ActiveRank(rank)
            }
            (ResultState::ActiveRank(rank), ResultLine::Kill { player, kills }) => {
                self.ranks.entry(rank).or_default().record(&player, kills);
                ResultState::ActiveRank(rank)
            }
            (ResultState::NoActiveRank, ResultLine::Kill { player, kills }) => {
                if self.rank_one_seen {
                    self.dropped += 1;
                    ResultState::NoActiveRank
                } else {
                    self.rank_one_seen = true;
                    self.ranks.entry(1).or_default().record(&player, kills);
                    ResultState::ActiveRank(1)
                }
            }
            (state, ResultLine::UnnamedKill) => {
                self.dropped += 1;
                state
            }
            (state, ResultLine::Noise | ResultLine::Unrecognized) => state,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ResultParser {
        ResultParser::new(&ParsingConfig::default()).unwrap()
    }

    #[test]
    fn test_rank_with_kill_lines() {
        let ranks = parser().parse("1\nAlpha 3 finishes\nBravo 2 finishes");
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks[&1].players(), ["Alpha", "Bravo"]);
        assert_eq!(ranks[&1].kills(), [3, 2]);
    }

    #[test]
    fn test_unlabelled_first_panel_is_rank_one() {
        let ranks = parser().parse("Alpha 4 finishes\nBravo 1 finish\n2\nCharlie 0 finishes");
        assert_eq!(ranks[&1].players(), ["Alpha", "Bravo"]);
        assert_eq!(ranks[&1].kills(), [4, 1]);
        assert_eq!(ranks[&2].players(), ["Charlie"]);
    }

    #[test]
    fn test_explicit_rank_one_not_duplicated() {
        let ranks = parser().parse("1\nAlpha 4 finishes\n2\nBravo 1 finishes");
        assert_eq!(ranks.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ranks[&1].len(), 1);
    }

    #[test]
    fn test_unnamed_kill_line_dropped() {
        let ranks = parser().parse("3\n0 finishes\nAlpha 2 finishes\n4 1 finishes");
        assert_eq!(ranks[&3].players(), ["Alpha"]);
        assert_eq!(ranks[&3].kills(), [2]);
    }

    #[test]
    fn test_reordered_kill_line() {
        let ranks = parser().parse("5\n2 finishes Alpha");
        assert_eq!(ranks[&5].players(), ["Alpha"]);
        assert_eq!(ranks[&5].kills(), [2]);
    }

    #[test]
    fn test_case_insensitive_and_name_cleanup() {
        let ranks = parser().parse("6\n12   Big   Boss 7 FINISHES");
        assert_eq!(ranks[&6].players(), ["Big Boss"]);
        assert_eq!(ranks[&6].kills(), [7]);
    }

    #[test]
    fn test_noise_lines_ignored() {
        let ranks = parser().parse("Stage 2\n7\nTap to continue\nAlpha 1 finishes");
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks[&7].players(), ["Alpha"]);
    }

    #[test]
    fn test_empty_rank_group_kept() {
        let ranks = parser().parse("8\n9\nAlpha 1 finishes");
        assert!(ranks[&8].is_empty());
        assert_eq!(ranks[&9].len(), 1);
    }

    #[test]
    fn test_state_persists_across_boundary_by_default() {
        let ranks = parser().parse("10\nAlpha 1 finishes\n---IMAGE BREAK---\nBravo 2 finishes");
        assert_eq!(ranks[&10].players(), ["Alpha", "Bravo"]);
    }

    #[test]
    fn test_reset_policy_drops_orphan_kills_after_rank_one() {
        let config = ParsingConfig {
            boundary_policy: BoundaryPolicy::Reset,
            ..ParsingConfig::default()
        };
        let parser = ResultParser::new(&config).unwrap();
        let ranks = parser.parse("1\nAlpha 1 finishes\n---IMAGE BREAK---\nBravo 2 finishes\n11\nCharlie 3 finishes");
        assert_eq!(ranks[&1].players(), ["Alpha"]);
        assert_eq!(ranks[&11].players(), ["Charlie"]);
        assert!(!ranks.values().any(|r| r.players().contains(&"Bravo".to_string())));
    }

    #[test]
    fn test_huge_kill_count_is_unrecognized() {
        let p = parser();
        assert_eq!(p.classify_line("Alpha 99999999999 finishes"), ResultLine::Unrecognized);
    }

    #[test]
    fn test_classify_line() {
        let p = parser();
        assert_eq!(p.classify_line("---IMAGE BREAK---"), ResultLine::Boundary);
        assert_eq!(p.classify_line("12"), ResultLine::RankNumber(12));
        assert_eq!(p.classify_line("0 finishes"), ResultLine::UnnamedKill);
        assert_eq!(
            p.classify_line("Zed 3 finish"),
            ResultLine::Kill { player: "Zed".to_string(), kills: 3 }
        );
        assert_eq!(p.classify_line("Zed"), ResultLine::Unrecognized);
        assert_eq!(p.classify_line("75"), ResultLine::Unrecognized);
    }

    #[test]
    fn test_record_keeps_lists_aligned() {
        let entry: RankEntry = [("Alpha", 1), ("Bravo", 0)].into_iter().collect();
        assert_eq!(entry.players().len(), entry.kills().len());
        assert_eq!(entry.kills(), [1, 0]);
    }
}
