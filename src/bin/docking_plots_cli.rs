use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;

use dockmetrics_rs::config::{DEFAULT_PAIRPLOT_MAX_ROWS, DEFAULT_PLOT_DIR, DEFAULT_SUMMARY_CSV, DEFAULT_TOP_N};
use dockmetrics_rs::{run_all, PlotConfig};

/// Renders the docking summary CSV into a set of PNG charts.
#[derive(Debug, Parser)]
#[command(name = "docking-plots", version)]
struct Args {
    /// Summary CSV written by docking-metrics
    #[arg(long, default_value = DEFAULT_SUMMARY_CSV)]
    csv: PathBuf,

    /// Output directory for the PNG files
    #[arg(long, default_value = DEFAULT_PLOT_DIR)]
    plot_dir: PathBuf,

    /// Number of ligands in each per-receptor ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Rows above this count are thinned for the pair plot
    #[arg(long, default_value_t = DEFAULT_PAIRPLOT_MAX_ROWS)]
    pairplot_max_rows: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = PlotConfig {
        csv_path: args.csv,
        plot_dir: args.plot_dir,
        top_n: args.top_n,
        pairplot_max_rows: args.pairplot_max_rows,
    };

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style.tick_strings(&[
            "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
        ]));
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Rendering charts from {}...", config.csv_path.display()));

    match run_all(&config) {
        Ok(written) => {
            spinner.finish_with_message(format!(
                "{} chart(s) written to {}.",
                written.len(),
                config.plot_dir.display()
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
