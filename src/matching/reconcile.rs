//! Links lobby slots to result ranks by player-name overlap.
//!
//! Slots are walked in ascending order and each takes the unclaimed rank whose
//! players best overlap its roster. A rank is claimed by at most one slot.
//! Per-player kill lookup inside the chosen rank is independent for every
//! roster name, so two roster names can resolve to the same result line.

use serde::Serialize;
use std::collections::BTreeSet;

use super::similarity::NameMatcher;
use crate::parse::{RankMap, RankNumber, SlotMap, SlotNumber};

/// One row of the final report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReconciledSlot {
    pub slot: SlotNumber,
    /// Rank claimed by this slot, if any rank matched
    pub rank: Option<RankNumber>,
    /// Sum of resolved player kills; `None` when unranked
    pub team_kills: Option<u32>,
    pub players: Vec<String>,
    /// Kills per roster position; empty when unranked
    pub player_kills: Vec<Option<u32>>,
}

impl ReconciledSlot {
    fn placeholder(slot: SlotNumber) -> Self {
        Self {
            slot,
            rank: None,
            team_kills: None,
            players: Vec::new(),
            player_kills: Vec::new(),
        }
    }

    fn unranked(slot: SlotNumber, players: Vec<String>) -> Self {
        Self {
            players,
            ..Self::placeholder(slot)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rank.is_some()
    }
}

/// Picks the unclaimed rank with the highest overlap score.
///
/// Ranks are scanned in ascending order and only a strictly better score
/// replaces the current pick, so ties go to the lowest rank. A best score of
/// zero means no match.
fn best_rank(
    matcher: &NameMatcher,
    roster: &[String],
    ranks: &RankMap,
    claimed: &BTreeSet<RankNumber>,
) -> Option<RankNumber> {
    let mut best: Option<(RankNumber, usize)> = None;
    for (&rank, entry) in ranks.iter().filter(|(r, _)| !claimed.contains(*r)) {
        let score = matcher.count_matches(roster, entry.players());
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((rank, score));
        }
    }
    best.map(|(rank, _)| rank)
}

/// Reconciles every slot in `[min, max]` of the observed slot numbers.
///
/// Returns an empty list when no slot was observed.
pub fn reconcile(slots: &SlotMap, ranks: &RankMap, matcher: &NameMatcher) -> Vec<ReconciledSlot> {
    let (Some(&min), Some(&max)) = (slots.keys().next(), slots.keys().next_back()) else {
        return Vec::new();
    };

    let mut claimed: BTreeSet<RankNumber> = BTreeSet::new();
    let mut output = Vec::with_capacity(usize::from(max - min) + 1);

    for slot in min..=max {
        let roster = match slots.get(&slot) {
            Some(roster) if !roster.is_empty() => roster.names(),
            _ => {
                output.push(ReconciledSlot::placeholder(slot));
                continue;
            }
        };

        let Some(rank) = best_rank(matcher, roster, ranks, &claimed) else {
            crate::log(&format!("Slot {}: no matching rank", slot));
            output.push(ReconciledSlot::unranked(slot, roster.to_vec()));
            continue;
        };
        claimed.insert(rank);

        let entry = &ranks[&rank];
        let player_kills: Vec<Option<u32>> = roster
            .iter()
            .map(|name| {
                matcher
                    .best_match(name, entry.players())
                    .map(|idx| entry.kills()[idx])
            })
            .collect();
        let team_kills: u32 = player_kills.iter().flatten().sum();

        output.push(ReconciledSlot {
            slot,
            rank: Some(rank),
            team_kills: Some(team_kills),
            players: roster.to_vec(),
            player_kills,
        });
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use crate::parse::lobby::Roster;
    use crate::parse::result::RankEntry;

    fn matcher() -> NameMatcher {
        NameMatcher::new(&MatchingConfig::default())
    }

    fn slot_map(entries: &[(SlotNumber, &[&str])]) -> SlotMap {
        entries
            .iter()
            .map(|(slot, names)| (*slot, names.iter().collect::<Roster>()))
            .collect()
    }

    fn rank_map(entries: &[(RankNumber, &[(&str, u32)])]) -> RankMap {
        entries
            .iter()
            .map(|(rank, players)| (*rank, players.iter().copied().collect::<RankEntry>()))
            .collect()
    }

    #[test]
    fn test_simple_match() {
        let slots = slot_map(&[(5, &["Alpha", "Bravo"])]);
        let ranks = rank_map(&[(1, &[("Alpha", 3), ("Bravo", 2)])]);

        let out = reconcile(&slots, &ranks, &matcher());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].slot, 5);
        assert_eq!(out[0].rank, Some(1));
        assert_eq!(out[0].team_kills, Some(5));
        assert_eq!(out[0].player_kills, vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_no_slots_gives_empty_output() {
        let ranks = rank_map(&[(1, &[("Alpha", 3)])]);
        assert!(reconcile(&SlotMap::new(), &ranks, &matcher()).is_empty());
    }

    #[test]
    fn test_gap_slots_are_placeholders() {
        let slots = slot_map(&[(3, &["Alpha"]), (5, &["Bravo"])]);
        let out = reconcile(&slots, &RankMap::new(), &matcher());

        assert_eq!(out.iter().map(|s| s.slot).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(out[1], ReconciledSlot::placeholder(4));
    }

    #[test]
    fn test_empty_observed_roster_is_placeholder() {
        let slots = slot_map(&[(2, &[]), (3, &["Alpha"])]);
        let ranks = rank_map(&[(1, &[("Alpha", 1)])]);
        let out = reconcile(&slots, &ranks, &matcher());
        assert_eq!(out[0], ReconciledSlot::placeholder(2));
        assert_eq!(out[1].rank, Some(1));
    }

    #[test]
    fn test_unmatched_roster_is_kept() {
        let slots = slot_map(&[(7, &["Alpha", "Bravo"])]);
        let ranks = rank_map(&[(1, &[("Zulu", 4)])]);
        let out = reconcile(&slots, &ranks, &matcher());

        assert_eq!(out[0].rank, None);
        assert_eq!(out[0].team_kills, None);
        assert_eq!(out[0].players, vec!["Alpha", "Bravo"]);
        assert!(out[0].player_kills.is_empty());
    }

    #[test]
    fn test_rank_claimed_once() {
        // Both slots match rank 1 equally; only the first gets it
        let slots = slot_map(&[(1, &["Alpha"]), (2, &["Alpha"])]);
        let ranks = rank_map(&[(1, &[("Alpha", 2)])]);
        let out = reconcile(&slots, &ranks, &matcher());

        assert_eq!(out[0].rank, Some(1));
        assert_eq!(out[1].rank, None);
    }

    #[test]
    fn test_highest_score_wins_and_ties_go_to_lowest_rank() {
        let slots = slot_map(&[(1, &["Alpha", "Bravo"]), (2, &["Charlie"])]);
        let ranks = rank_map(&[
            (2, &[("Alpha", 1)]),
            (4, &[("Alpha", 1), ("Bravo", 1)]),
            (6, &[("Charlie", 0)]),
            (8, &[("Charlie", 3)]),
        ]);
        let out = reconcile(&slots, &ranks, &matcher());

        assert_eq!(out[0].rank, Some(4));
        assert_eq!(out[1].rank, Some(6));
    }

    #[test]
    fn test_unresolved_player_kill_is_none() {
        let slots = slot_map(&[(1, &["Alpha", "Xk"])]);
        let ranks = rank_map(&[(3, &[("Alpha", 2), ("Bravo", 5)])]);
        let out = reconcile(&slots, &ranks, &matcher());

        assert_eq!(out[0].player_kills, vec![Some(2), None]);
        assert_eq!(out[0].team_kills, Some(2));
    }

    #[test]
    fn test_fuzzy_names_resolve_kills() {
        let slots = slot_map(&[(1, &["R0bertt", "Alpha"])]);
        let ranks = rank_map(&[(2, &[("Robert", 4), ("Alpha", 1)])]);
        let out = reconcile(&slots, &ranks, &matcher());

        assert_eq!(out[0].player_kills, vec![Some(4), Some(1)]);
        assert_eq!(out[0].team_kills, Some(5));
    }

    #[test]
    fn test_assignment_is_injective_and_idempotent() {
        let slots = slot_map(&[
            (1, &["Alpha", "Bravo"]),
            (2, &["Alpha", "Charlie"]),
            (3, &["Delta"]),
            (4, &["Alpha"]),
        ]);
        let ranks = rank_map(&[
            (1, &[("Alpha", 1), ("Bravo", 1)]),
            (2, &[("Alpha", 0), ("Charlie", 2)]),
            (3, &[("Delta", 5)]),
        ]);
        let first = reconcile(&slots, &ranks, &matcher());
        let second = reconcile(&slots, &ranks, &matcher());
        assert_eq!(first, second);

        let assigned: Vec<RankNumber> = first.iter().filter_map(|s| s.rank).collect();
        let unique: BTreeSet<RankNumber> = assigned.iter().copied().collect();
        assert_eq!(assigned.len(), unique.len());
        assert_eq!(first[3].rank, None);
    }
}
