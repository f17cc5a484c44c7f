//! Extraction of receptor, ligand and best affinity from AutoDock Vina logs.
//!
//! Names are taken from the `Rigid receptor:` / `Ligand:` lines when Vina
//! printed them. Older logs omit them, in which case the run directory name
//! (`<receptor>_<ligand>`) is used instead.

use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use crate::error::DockingError;
use crate::textio::{is_not_found, open_text};

static RECEPTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rigid receptor:\s*(.*\.pdbqt)").unwrap());
static LIGAND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Ligand:\s*(.*\.pdbqt)").unwrap());
// Row of binding mode 1 in the result table, anchored at line start.
static AFFINITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+1\s+([-+]?\d*\.?\d+)").unwrap());

/// Fields recovered from one Vina log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VinaLogSummary {
    pub receptor: Option<String>,
    pub ligand: Option<String>,
    /// Affinity of binding mode 1, kcal/mol
    pub affinity: Option<f64>,
    pub receptor_from_log: bool,
    pub ligand_from_log: bool,
}

impl VinaLogSummary {
    /// Both names known and non-empty; a run directory like `rec_` yields an
    /// empty ligand that must not be looked up.
    pub fn has_names(&self) -> bool {
        let named = |name: &Option<String>| name.as_deref().is_some_and(|n| !n.is_empty());
        named(&self.receptor) && named(&self.ligand)
    }
}

/// `/path/to/rec.pdbqt` -> `rec`
fn structure_base_name(captured: &str) -> String {
    let trimmed = captured.trim();
    let base = Path::new(trimmed)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| trimmed.to_string());
    base.replace(".pdbqt", "")
}

/// Splits a run directory name like `5HT2A_ligand_01` into
/// (`5HT2A`, `ligand_01`). Needs at least one underscore.
pub fn names_from_dir_name(dir_name: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = dir_name.split('_').collect();
    if parts.len() < 2 {
        return None;
    }
    Some((parts[0].to_string(), parts[1..].join("_")))
}

/// Scans log lines once, filling in whatever is found.
fn scan_lines<R: BufRead>(reader: R, summary: &mut VinaLogSummary) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;

        if !summary.receptor_from_log {
            if let Some(caps) = RECEPTOR_PATTERN.captures(&line) {
                summary.receptor = Some(structure_base_name(&caps[1]));
                summary.receptor_from_log = true;
            }
        }

        if !summary.ligand_from_log {
            if let Some(caps) = LIGAND_PATTERN.captures(&line) {
                summary.ligand = Some(structure_base_name(&caps[1]));
                summary.ligand_from_log = true;
            }
        }

        if summary.affinity.is_none() {
            if let Some(caps) = AFFINITY_PATTERN.captures(&line) {
                summary.affinity = caps[1].parse::<f64>().ok();
                if summary.affinity.is_some() && summary.receptor_from_log && summary.ligand_from_log {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Parses a Vina log, falling back to the parent directory name for any
/// receptor/ligand name the log does not state.
///
/// Only a missing log file is an error; read failures part-way through are
/// logged and whatever was recovered is returned.
pub fn parse_vina_log(log_file: &Path) -> Result<VinaLogSummary, DockingError> {
    let mut summary = VinaLogSummary::default();

    match open_text(log_file) {
        Ok(reader) => {
            if let Err(e) = scan_lines(reader, &mut summary) {
                warn!("Error reading log file {}: {}", log_file.display(), e);
            }
        }
        Err(e) if is_not_found(&e) => {
            return Err(DockingError::LogNotFound(log_file.to_path_buf()));
        }
        Err(e) => {
            warn!("Error reading log file {}: {}", log_file.display(), e);
        }
    }

    if !summary.receptor_from_log || !summary.ligand_from_log {
        apply_directory_fallback(log_file, &mut summary);
    }

    if !summary.has_names() {
        warn!("Failed to determine Receptor or Ligand name for {}", log_file.display());
    }
    if summary.affinity.is_none() {
        warn!("Could not parse affinity score (mode 1) from log: {}", log_file.display());
    }

    Ok(summary)
}

fn apply_directory_fallback(log_file: &Path, summary: &mut VinaLogSummary) {
    let log_dir = log_file.parent().unwrap_or_else(|| Path::new(""));
    let dir_name = log_dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match names_from_dir_name(&dir_name) {
        Some((receptor, ligand)) => {
            if !summary.receptor_from_log {
                summary.receptor = Some(receptor);
            }
            if !summary.ligand_from_log {
                summary.ligand = Some(ligand);
            }
        }
        None => {
            if !summary.has_names() {
                warn!(
                    "Could not parse receptor/ligand name from log content OR directory structure: {}",
                    log_dir.display()
                );
            }
        }
    }
}
