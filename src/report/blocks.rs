//! Five-block columnar output.
//!
//! Blocks 1-3 have one row per slot (slot, rank, team kills). Blocks 4-5 have
//! a fixed number of rows per slot (player name, player kills) so they can be
//! pasted straight into a spreadsheet next to each other.

use serde::Serialize;

use crate::config::OutputConfig;
use crate::matching::ReconciledSlot;

/// Slot counts shown under the blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    pub total_slots: usize,
    /// Slots with an assigned rank
    pub complete: usize,
    /// Slots without an assigned rank
    pub missing: usize,
    pub rows_per_slot: usize,
}

impl OutputSummary {
    /// One-line summary, e.g. for a log or terminal footer.
    pub fn summary_line(&self) -> String {
        format!(
            "Processed {} slots · Blocks 1–3: {} lines · Blocks 4–5: {} lines · {} complete · {} missing",
            self.total_slots,
            self.total_slots,
            self.total_slots * self.rows_per_slot,
            self.complete,
            self.missing
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchOutput {
    pub slots: Vec<String>,
    pub ranks: Vec<String>,
    pub team_kills: Vec<String>,
    pub players: Vec<String>,
    pub player_kills: Vec<String>,
    pub summary: OutputSummary,
}

/// Zero and unknown render the same: the format can't tell them apart.
fn render_kills(kills: Option<u32>, sentinel: &str) -> String {
    match kills {
        Some(k) if k > 0 => k.to_string(),
        _ => sentinel.to_string(),
    }
}

impl MatchOutput {
    /// Flattens reconciled slots (already sorted by slot number) into blocks.
    pub fn from_slots(slots: &[ReconciledSlot], config: &OutputConfig) -> Self {
        let sentinel = config.empty_sentinel.as_str();
        let rows = config.rows_per_slot;
        let mut output = MatchOutput {
            summary: OutputSummary {
                total_slots: slots.len(),
                rows_per_slot: rows,
                ..OutputSummary::default()
            },
            ..MatchOutput::default()
        };

        for slot in slots {
            if slot.is_complete() {
                output.summary.complete += 1;
            } else {
                output.summary.missing += 1;
            }

            output.slots.push(slot.slot.to_string());
            output.ranks.push(
                slot.rank
                    .map_or_else(|| sentinel.to_string(), |r| r.to_string()),
            );
            output.team_kills.push(render_kills(slot.team_kills, sentinel));

            for row in 0..rows {
                output.players.push(
                    slot.players
                        .get(row)
                        .cloned()
                        .unwrap_or_else(|| sentinel.to_string()),
                );
                output.player_kills.push(render_kills(
                    slot.player_kills.get(row).copied().flatten(),
                    sentinel,
                ));
            }
        }

        output
    }

    /// The five blocks in output order.
    pub fn blocks(&self) -> [&[String]; 5] {
        [
            &self.slots,
            &self.ranks,
            &self.team_kills,
            &self.players,
            &self.player_kills,
        ]
    }

    /// One block as newline-separated text. `index` is 1-based.
    pub fn block_text(&self, index: usize) -> Option<String> {
        let blocks = self.blocks();
        index
            .checked_sub(1)
            .and_then(|i| blocks.get(i))
            .map(|block| block.join("\n"))
    }
}
