//! Writes a finished report to a session folder.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::MatchReport;
use super::blocks::MatchOutput;

/// Writes `block1.txt` .. `block5.txt`, one value per line.
///
/// Returns the written paths in block order.
pub fn write_blocks(output: &MatchOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;

    let mut paths = Vec::with_capacity(5);
    for (i, block) in output.blocks().iter().enumerate() {
        let path = dir.join(format!("block{}.txt", i + 1));
        let mut file = File::create(&path)
            .context(format!("Failed to create block file: {}", path.display()))?;
        for value in block.iter() {
            writeln!(file, "{}", value).context("Failed to write block row")?;
        }
        paths.push(path);
    }

    Ok(paths)
}

/// Export the report to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_to_json(report: &MatchReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Saves the joined OCR text so it can be corrected by hand and re-parsed.
pub fn write_raw_text(dir: &Path, lobby_text: &str, result_text: &str) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;

    let lobby_path = dir.join("lobby_raw.txt");
    let result_path = dir.join("result_raw.txt");
    fs::write(&lobby_path, lobby_text).context("Failed to write lobby_raw.txt")?;
    fs::write(&result_path, result_text).context("Failed to write result_raw.txt")?;

    Ok((lobby_path, result_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::matching::ReconciledSlot;
    use tempfile::tempdir;

    fn report() -> MatchReport {
        let slots = vec![ReconciledSlot {
            slot: 5,
            rank: Some(1),
            team_kills: Some(5),
            players: vec!["Alpha".to_string(), "Bravo".to_string()],
            player_kills: vec![Some(3), Some(2)],
        }];
        let output = MatchOutput::from_slots(&slots, &OutputConfig::default());
        MatchReport { slots, output }
    }

    #[test]
    fn test_write_blocks() {
        let dir = tempdir().unwrap();
        let report = report();

        let paths = write_blocks(&report.output, dir.path()).unwrap();
        assert_eq!(paths.len(), 5);

        let block1 = std::fs::read_to_string(dir.path().join("block1.txt")).unwrap();
        assert_eq!(block1, "5\n");

        let block4 = std::fs::read_to_string(dir.path().join("block4.txt")).unwrap();
        assert_eq!(block4.lines().count(), 6);
        assert!(block4.starts_with("Alpha\nBravo\n\"\"\n"));
    }

    #[test]
    fn test_export_to_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        export_to_json(&report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"team_kills\": 5"));
        assert!(content.contains("\"complete\": 1"));
        assert!(content.contains("\"Alpha\""));
    }

    #[test]
    fn test_write_raw_text_creates_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("session");

        let (lobby, result) = write_raw_text(&nested, "05\nAlpha", "1\nAlpha 3 finishes").unwrap();
        assert_eq!(std::fs::read_to_string(lobby).unwrap(), "05\nAlpha");
        assert_eq!(std::fs::read_to_string(result).unwrap(), "1\nAlpha 3 finishes");
    }
}
