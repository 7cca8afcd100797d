//! BGMI Stat Extractor
//!
//! Reads lobby and result screenshots of a match, OCRs them with Tesseract,
//! and reconciles the two into per-slot rank and kill blocks ready to paste
//! into a points table.

mod config;
mod matching;
mod ocr;
mod parse;
mod paths;
mod report;
mod session;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use config::ExtractorConfig;
use ocr::TesseractCli;
use report::MatchReport;
use session::MatchSession;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("bgmi_stats.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[derive(Parser)]
#[command(name = "bgmi-stats")]
#[command(about = "Turn BGMI lobby and result screenshots into slot/rank/kill blocks")]
#[command(version)]
struct Cli {
    /// Path to config.json (defaults to the one next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR screenshots and build the report
    Extract {
        /// Lobby screenshots
        #[arg(long, num_args = 1..)]
        lobby: Vec<PathBuf>,
        /// Result screenshots
        #[arg(long, num_args = 1..)]
        result: Vec<PathBuf>,
        /// Screenshots of either kind; labelled by their text
        images: Vec<PathBuf>,
        /// Output folder (defaults to a new timestamped session folder)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Re-run parsing on saved (possibly hand-corrected) OCR text
    Reparse {
        #[arg(long)]
        lobby_text: PathBuf,
        #[arg(long)]
        result_text: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Write the default config.json
    InitConfig {
        /// Destination (defaults to config.json next to the executable)
        path: Option<PathBuf>,
    },
}

/// Session stamp in the summary bar, e.g. "07/Mar · 9:05 PM".
fn session_stamp() -> String {
    Local::now().format("%d/%b · %-I:%M %p").to_string()
}

fn print_report(report: &MatchReport) {
    let summary = &report.output.summary;
    println!();
    println!("{}  |  {}", session_stamp(), summary.summary_line());

    let titles = ["Slot", "Rank", "Team kills", "Players", "Player kills"];
    for (i, title) in titles.iter().enumerate() {
        if let Some(text) = report.output.block_text(i + 1) {
            println!();
            println!("== Block {}: {} ==", i + 1, title);
            println!("{}", text);
        }
    }
}

fn save_report(report: &MatchReport, dir: &Path) -> Result<()> {
    let block_paths = report::write_blocks(&report.output, dir)?;
    log(&format!("Saved {} block files to {}", block_paths.len(), dir.display()));

    let json_path = dir.join("report.json");
    report::export_to_json(report, &json_path)?;
    log(&format!("Report JSON saved: {}", json_path.display()));
    Ok(())
}

fn run_extract(
    config: &ExtractorConfig,
    lobby: &[PathBuf],
    result: &[PathBuf],
    images: &[PathBuf],
    out: Option<PathBuf>,
) -> Result<()> {
    let recognizer = TesseractCli::from_config(&config.ocr)?;
    let session = MatchSession::from_images(&recognizer, lobby, result, images)?;
    log(&format!(
        "OCR done: {} lobby, {} result, {} skipped",
        session.lobby_count(),
        session.result_count(),
        session.skipped_count()
    ));

    let dir = out.unwrap_or_else(paths::new_session_dir);
    let lobby_text = session.lobby_text();
    let result_text = session.result_text();

    // Raw text is saved even if reconciliation fails, so it can be fixed and re-parsed
    let (lobby_raw, result_raw) = report::write_raw_text(&dir, &lobby_text, &result_text)?;
    log(&format!(
        "Raw OCR text saved: {} / {}",
        lobby_raw.display(),
        result_raw.display()
    ));

    let report = session.build_report(config)?;
    print_report(&report);
    save_report(&report, &dir)
}

fn run_reparse(
    config: &ExtractorConfig,
    lobby_text: &Path,
    result_text: &Path,
    out: Option<PathBuf>,
) -> Result<()> {
    let lobby = std::fs::read_to_string(lobby_text)
        .context(format!("Failed to read {}", lobby_text.display()))?;
    let result = std::fs::read_to_string(result_text)
        .context(format!("Failed to read {}", result_text.display()))?;

    let report = session::build_report(&lobby, &result, config)?;
    print_report(&report);

    let dir = out.unwrap_or_else(paths::new_session_dir);
    save_report(&report, &dir)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    paths::ensure_directories()?;

    if let Commands::InitConfig { path } = &cli.command {
        let path = path
            .clone()
            .unwrap_or_else(|| paths::get_exe_dir().join("config.json"));
        ExtractorConfig::save_default(&path)?;
        log(&format!("Default config written to {}", path.display()));
        return Ok(());
    }

    let config = ExtractorConfig::load_or_default(cli.config.as_deref());

    let outcome = match cli.command {
        Commands::Extract {
            lobby,
            result,
            images,
            out,
        } => run_extract(&config, &lobby, &result, &images, out),
        Commands::Reparse {
            lobby_text,
            result_text,
            out,
        } => run_reparse(&config, &lobby_text, &result_text, out),
        Commands::InitConfig { .. } => Ok(()),
    };

    if let Err(e) = &outcome {
        log(&format!("Error: {:#}", e));
    }
    outcome
}
