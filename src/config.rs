use std::path::PathBuf;

/// Directories searched for ligand structures when none are given.
pub const DEFAULT_LIGAND_DIRS: [&str; 2] = ["ligands", "ligands_pdbqt"];

pub const DEFAULT_SUMMARY_CSV: &str = "docking_summary_metrics.csv";
pub const DEFAULT_PLOT_DIR: &str = "plots";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_PAIRPLOT_MAX_ROWS: usize = 1000;

pub fn default_ligand_dirs() -> Vec<PathBuf> {
    DEFAULT_LIGAND_DIRS.iter().map(PathBuf::from).collect()
}

/// Settings of one plotting run.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub csv_path: PathBuf,
    pub plot_dir: PathBuf,
    /// How many ligands the per-receptor ranking shows
    pub top_n: usize,
    /// Above this many rows the pair plot uses an evenly strided subset
    pub pairplot_max_rows: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_SUMMARY_CSV),
            plot_dir: PathBuf::from(DEFAULT_PLOT_DIR),
            top_n: DEFAULT_TOP_N,
            pairplot_max_rows: DEFAULT_PAIRPLOT_MAX_ROWS,
        }
    }
}
