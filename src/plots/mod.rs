//! Charts over the aggregated docking summary CSV.
//!
//! The table is loaded once and every chart is rendered independently; a
//! chart that fails is logged and the rest still run.

pub mod charts;
pub mod pairplot;
pub mod stats;

use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use plotters::style::{Color, Palette, Palette99, RGBAColor};
use serde::Deserialize;

use crate::config::PlotConfig;
use crate::error::DockingError;
use crate::textio::{is_not_found, open_text};
use crate::types::CSV_HEADER;

/// The numeric columns of the summary, in CSV order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Affinity,
    Pki,
    Mw,
    LogP,
    Tpsa,
    Nha,
    Nrb,
    Hbd,
    Hba,
    Sasa,
    Qed,
    Le,
    Lle,
    SileN,
    SileSasa,
}

impl Metric {
    pub const ALL: [Metric; 15] = [
        Metric::Affinity,
        Metric::Pki,
        Metric::Mw,
        Metric::LogP,
        Metric::Tpsa,
        Metric::Nha,
        Metric::Nrb,
        Metric::Hbd,
        Metric::Hba,
        Metric::Sasa,
        Metric::Qed,
        Metric::Le,
        Metric::Lle,
        Metric::SileN,
        Metric::SileSasa,
    ];

    /// Metrics shown in the pair plot.
    pub const PAIRPLOT: [Metric; 7] = [
        Metric::Affinity,
        Metric::Pki,
        Metric::Mw,
        Metric::LogP,
        Metric::Le,
        Metric::SileSasa,
        Metric::Qed,
    ];

    /// CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Affinity => "Affinity_kcal_mol",
            Metric::Pki => "pKi",
            Metric::Mw => "MW",
            Metric::LogP => "LogP",
            Metric::Tpsa => "TPSA",
            Metric::Nha => "NHA",
            Metric::Nrb => "NRB",
            Metric::Hbd => "HBD",
            Metric::Hba => "HBA",
            Metric::Sasa => "SASA_A2",
            Metric::Qed => "QED",
            Metric::Le => "LE",
            Metric::Lle => "LLE",
            Metric::SileN => "SILE_N",
            Metric::SileSasa => "SILE_SASA",
        }
    }

    pub fn value(self, row: &SummaryRow) -> Option<f64> {
        match self {
            Metric::Affinity => row.affinity,
            Metric::Pki => row.pki,
            Metric::Mw => row.mw,
            Metric::LogP => row.logp,
            Metric::Tpsa => row.tpsa,
            Metric::Nha => row.nha,
            Metric::Nrb => row.nrb,
            Metric::Hbd => row.hbd,
            Metric::Hba => row.hba,
            Metric::Sasa => row.sasa,
            Metric::Qed => row.qed,
            Metric::Le => row.le,
            Metric::Lle => row.lle,
            Metric::SileN => row.sile_n,
            Metric::SileSasa => row.sile_sasa,
        }
    }
}

/// One row of the summary CSV. Unparseable numbers become `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Receptor", default)]
    pub receptor: Option<String>,
    #[serde(rename = "Ligand", default)]
    pub ligand: Option<String>,
    #[serde(rename = "Affinity_kcal_mol", default, deserialize_with = "csv::invalid_option")]
    pub affinity: Option<f64>,
    #[serde(rename = "pKi", default, deserialize_with = "csv::invalid_option")]
    pub pki: Option<f64>,
    #[serde(rename = "MW", default, deserialize_with = "csv::invalid_option")]
    pub mw: Option<f64>,
    #[serde(rename = "LogP", default, deserialize_with = "csv::invalid_option")]
    pub logp: Option<f64>,
    #[serde(rename = "TPSA", default, deserialize_with = "csv::invalid_option")]
    pub tpsa: Option<f64>,
    #[serde(rename = "NHA", default, deserialize_with = "csv::invalid_option")]
    pub nha: Option<f64>,
    #[serde(rename = "NRB", default, deserialize_with = "csv::invalid_option")]
    pub nrb: Option<f64>,
    #[serde(rename = "HBD", default, deserialize_with = "csv::invalid_option")]
    pub hbd: Option<f64>,
    #[serde(rename = "HBA", default, deserialize_with = "csv::invalid_option")]
    pub hba: Option<f64>,
    #[serde(rename = "SASA_A2", default, deserialize_with = "csv::invalid_option")]
    pub sasa: Option<f64>,
    #[serde(rename = "QED", default, deserialize_with = "csv::invalid_option")]
    pub qed: Option<f64>,
    #[serde(rename = "LE", default, deserialize_with = "csv::invalid_option")]
    pub le: Option<f64>,
    #[serde(rename = "LLE", default, deserialize_with = "csv::invalid_option")]
    pub lle: Option<f64>,
    #[serde(rename = "SILE_N", default, deserialize_with = "csv::invalid_option")]
    pub sile_n: Option<f64>,
    #[serde(rename = "SILE_SASA", default, deserialize_with = "csv::invalid_option")]
    pub sile_sasa: Option<f64>,
}

impl SummaryRow {
    /// Maps `NA`/blank names and non-finite numbers to missing.
    fn normalize(mut self) -> Self {
        for name in [&mut self.receptor, &mut self.ligand] {
            if name.as_deref().map(|s| s.trim().is_empty() || s.trim() == "NA").unwrap_or(false) {
                *name = None;
            }
        }
        for value in [
            &mut self.affinity,
            &mut self.pki,
            &mut self.mw,
            &mut self.logp,
            &mut self.tpsa,
            &mut self.nha,
            &mut self.nrb,
            &mut self.hbd,
            &mut self.hba,
            &mut self.sasa,
            &mut self.qed,
            &mut self.le,
            &mut self.lle,
            &mut self.sile_n,
            &mut self.sile_sasa,
        ] {
            if value.map(|v| !v.is_finite()).unwrap_or(false) {
                *value = None;
            }
        }
        self
    }

    pub fn receptor(&self) -> &str {
        self.receptor.as_deref().unwrap_or_default()
    }

    pub fn ligand(&self) -> &str {
        self.ligand.as_deref().unwrap_or_default()
    }
}

/// Plot-ready rows: every row has a receptor, a ligand and an affinity.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Distinct receptors, sorted alphabetically.
    pub fn receptors(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r.receptor()).collect();
        set.into_iter().map(String::from).collect()
    }

    pub fn values(&self, metric: Metric) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| metric.value(r)).collect()
    }

    /// Points of rows that have both metrics, grouped by receptor index.
    pub fn points_by_receptor(&self, x: Metric, y: Metric) -> Vec<(String, Vec<(f64, f64)>)> {
        self.receptors()
            .into_iter()
            .map(|receptor| {
                let points = self
                    .rows
                    .iter()
                    .filter(|r| r.receptor() == receptor)
                    .filter_map(|r| Some((x.value(r)?, y.value(r)?)))
                    .collect();
                (receptor, points)
            })
            .collect()
    }
}

/// Reads the summary CSV, warning about expected columns that are absent and
/// dropping rows without affinity, receptor or ligand.
pub fn load_summary(path: &Path) -> Result<SummaryTable, DockingError> {
    let reader = match open_text(path) {
        Ok(reader) => reader,
        Err(e) if is_not_found(&e) => return Err(DockingError::CsvNotFound(path.to_path_buf())),
        Err(e) => return Err(e),
    };
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    info!("Columns: {:?}", headers.iter().collect::<Vec<_>>());
    for expected in CSV_HEADER {
        if !headers.iter().any(|h| h == expected) {
            warn!("Expected column '{}' not found in CSV.", expected);
        }
    }

    let mut total = 0usize;
    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<SummaryRow>() {
        let row = result?.normalize();
        total += 1;
        if row.affinity.is_some() && row.receptor.is_some() && row.ligand.is_some() {
            rows.push(row);
        }
    }
    info!(
        "Loaded {} row(s) from {}, {} left after dropping rows with missing Affinity/Receptor/Ligand",
        total,
        path.display(),
        rows.len()
    );
    Ok(SummaryTable { rows })
}

/// Colour of the receptor at `index` in the sorted receptor list.
pub(crate) fn receptor_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

/// Receptor names are used in file names; keep them to safe characters.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}

/// Runs one chart, logging the outcome. Returns the path when written.
fn render_logged<F>(path: PathBuf, render: F) -> Option<PathBuf>
where
    F: FnOnce(&Path) -> Result<(), Box<dyn Error>>,
{
    match render(&path) {
        Ok(()) => {
            info!("Generated: {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Failed to generate {}: {}", path.display(), e);
            None
        }
    }
}

/// Renders the full chart sequence into `config.plot_dir`. Only loading the
/// CSV and creating the output directory can fail; chart errors are logged.
pub fn run_all(config: &PlotConfig) -> Result<Vec<PathBuf>, DockingError> {
    let table = load_summary(&config.csv_path)?;
    fs::create_dir_all(&config.plot_dir).map_err(|e| DockingError::io(&config.plot_dir, e))?;
    let dir = config.plot_dir.as_path();
    let mut written = Vec::new();

    if table.rows.is_empty() {
        warn!("No rows left to plot in {}", config.csv_path.display());
        return Ok(written);
    }

    written.extend(render_logged(dir.join("affinity_distribution_overall.png"), |p| {
        charts::affinity_distribution(&table, p)
    }));

    let receptors = table.receptors();
    if receptors.len() > 1 {
        written.extend(render_logged(dir.join("affinity_boxplot_per_receptor.png"), |p| {
            charts::affinity_boxplot(&table, p)
        }));
    } else {
        info!("Skipping boxplot per receptor (only one receptor found).");
    }

    for receptor in &receptors {
        let path = dir.join(format!("top_ligands_{}.png", file_safe(receptor)));
        written.extend(render_logged(path, |p| {
            charts::top_ligands(&table, receptor, config.top_n, p)
        }));
    }

    for scatter in charts::SCATTERS {
        let has_points = table
            .points_by_receptor(scatter.x, scatter.y)
            .iter()
            .any(|(_, points)| !points.is_empty());
        if !has_points && scatter.skip_when_empty {
            info!("Skipping {} (missing data).", scatter.file_name);
            continue;
        }
        written.extend(render_logged(dir.join(scatter.file_name), |p| {
            charts::scatter(&table, &scatter, p)
        }));
    }

    written.extend(render_logged(dir.join("metrics_correlation_heatmap.png"), |p| {
        charts::correlation_heatmap(&table, p)
    }));

    let pair_rows = pairplot::pairplot_rows(&table, config.pairplot_max_rows);
    if pair_rows.is_empty() {
        info!("Skipping Pair Plot (no data after dropping missing values).");
    } else {
        info!("Generating Pair Plot (this might take a moment)...");
        written.extend(render_logged(dir.join("metrics_pairplot.png"), |p| {
            pairplot::render(&pair_rows, &receptors, p)
        }));
    }

    info!("All plots saved to the '{}' directory.", dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
Receptor,Ligand,Affinity_kcal_mol,pKi,MW,LogP,TPSA,NHA,NRB,HBD,HBA,SASA_A2,QED,LE,LLE,SILE_N,SILE_SASA
recB,lig1,-8.100,5.94,300.10,2.50,60.00,21,3,1,4,NA,0.71,0.386,3.44,3.253,NA
recA,lig2,-7.000,5.13,250.00,1.20,40.00,18,2,1,3,280.00,0.65,0.389,3.93,2.925,0.02
recA,lig3,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA
NA,lig4,-6.000,4.40,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA
recA,lig5,-9.500,inf,abc,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA
";

    #[test]
    fn loads_and_filters_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");
        fs::write(&path, SUMMARY).unwrap();

        let table = load_summary(&path).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.receptors(), vec!["recA".to_string(), "recB".to_string()]);

        let first = &table.rows[0];
        assert_eq!(first.ligand(), "lig1");
        assert_eq!(first.nha, Some(21.0));
        assert_eq!(first.sasa, None);

        // non-finite and unparseable values are missing
        let last = &table.rows[2];
        assert_eq!(last.pki, None);
        assert_eq!(last.mw, None);
        assert_eq!(last.affinity, Some(-9.5));
    }

    #[test]
    fn missing_columns_default_to_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("short.csv");
        fs::write(&path, "Receptor,Ligand,Affinity_kcal_mol\nrecA,lig1,-7.5\n").unwrap();

        let table = load_summary(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].qed, None);
        assert!(table.points_by_receptor(Metric::Mw, Metric::Affinity)[0].1.is_empty());
    }

    #[test]
    fn missing_csv_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_summary(&tmp.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DockingError::CsvNotFound(_)));
    }

    #[test]
    fn scatter_points_grouped_by_receptor() {
        let table = SummaryTable {
            rows: vec![
                SummaryRow {
                    receptor: Some("r1".into()),
                    ligand: Some("a".into()),
                    affinity: Some(-7.0),
                    mw: Some(200.0),
                    ..Default::default()
                },
                SummaryRow {
                    receptor: Some("r2".into()),
                    ligand: Some("b".into()),
                    affinity: Some(-8.0),
                    ..Default::default()
                },
            ],
        };
        let groups = table.points_by_receptor(Metric::Mw, Metric::Affinity);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1, vec![(200.0, -7.0)]);
        assert!(groups[1].1.is_empty());
    }

    #[test]
    fn receptor_names_are_made_file_safe() {
        assert_eq!(file_safe("5HT2A"), "5HT2A");
        assert_eq!(file_safe("rec A/1"), "rec_A_1");
    }
}
