use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;

use dockmetrics_rs::{default_ligand_dirs, summarize_logs, DockingError, DockingRecord, ReportWriter};

/// Extracts affinity, ligand descriptors and efficiency metrics from AutoDock
/// Vina logs and prints one CSV row per log.
#[derive(Debug, Parser)]
#[command(name = "docking-metrics", version)]
struct Args {
    /// Vina log files (log.txt, optionally gzipped)
    #[arg(required = true, num_args = 1..)]
    logs: Vec<PathBuf>,

    /// Directories searched for <ligand>.sdf / <ligand>.pdbqt [default: ligands ligands_pdbqt]
    #[arg(long = "ligand_dirs", alias = "ligand-dirs", num_args = 1..)]
    ligand_dirs: Vec<PathBuf>,

    /// Print the CSV header line before the rows
    #[arg(long)]
    header: bool,
}

fn progress_for(count: usize) -> ProgressBar {
    if count < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(count as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.blue} [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> ").tick_strings(&[
            "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
        ]));
    }
    bar.set_message("Processing Vina logs...");
    bar
}

fn write_rows(records: &[DockingRecord], header: bool) -> Result<(), DockingError> {
    let mut writer = ReportWriter::new(io::stdout().lock());
    if header {
        writer.write_header()?;
    }
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let ligand_dirs = if args.ligand_dirs.is_empty() {
        default_ligand_dirs()
    } else {
        args.ligand_dirs
    };

    let progress = progress_for(args.logs.len());
    let summary = summarize_logs(&args.logs, &ligand_dirs, &progress);
    progress.finish_and_clear();

    if let Err(e) = write_rows(&summary.records, args.header) {
        error!("Could not write CSV output: {}", e);
        return ExitCode::FAILURE;
    }

    if summary.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
