//src/pipeline.rs
//! From Vina log to summary record: log parsing, ligand lookup, descriptors
//! and efficiency metrics. Batches run in parallel over a shared descriptor
//! cache.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use indicatif::ProgressBar;
use log::{debug, warn};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::descriptors::compute_descriptors;
use crate::efficiency::{efficiency_metrics, pki};
use crate::error::DockingError;
use crate::molecule::{find_ligand_file, load_molecule};
use crate::types::{DockingRecord, LigandDescriptors};
use crate::vina_log::parse_vina_log;

/// Descriptors per ligand name. Ligands that could not be found or loaded
/// are cached too, as all-missing descriptors, so they warn only once.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: Mutex<AHashMap<String, LigandDescriptors>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns the cached descriptors of `ligand`, computing them on a miss.
    /// The lock is not held while the molecule is loaded, so two threads may
    /// race on the same ligand; both compute the same value.
    pub fn get_or_compute(&self, ligand: &str, search_dirs: &[PathBuf]) -> LigandDescriptors {
        if let Some(hit) = self.entries.lock().get(ligand) {
            return hit.clone();
        }
        let computed = ligand_descriptors(ligand, search_dirs);
        self.entries
            .lock()
            .entry(ligand.to_string())
            .or_insert(computed)
            .clone()
    }
}

/// Finds, loads and describes one ligand. Every failure is a warning and
/// yields all-missing descriptors.
pub fn ligand_descriptors(ligand: &str, search_dirs: &[PathBuf]) -> LigandDescriptors {
    let Some((path, format)) = find_ligand_file(ligand, search_dirs) else {
        return LigandDescriptors::default();
    };
    debug!("Loading ligand '{}' from {}", ligand, path.display());

    match load_molecule(&path, format) {
        Ok(mol) => compute_descriptors(&mol),
        Err(e) => {
            warn!(
                "Failed to load molecule object for {} from {}: {}",
                ligand,
                path.display(),
                e
            );
            LigandDescriptors::default()
        }
    }
}

/// Builds the summary record of one Vina log.
///
/// Only a missing log is an error. When receptor or ligand cannot be named,
/// the record carries just the parsed fields.
pub fn compute_record(
    log_file: &Path,
    search_dirs: &[PathBuf],
    cache: &DescriptorCache,
) -> Result<DockingRecord, DockingError> {
    let summary = parse_vina_log(log_file)?;
    let has_names = summary.has_names();

    let mut record = DockingRecord {
        receptor: summary.receptor,
        ligand: summary.ligand,
        affinity: summary.affinity,
        ..Default::default()
    };
    if !has_names {
        return Ok(record);
    }
    let Some(ligand) = record.ligand.as_deref() else {
        return Ok(record);
    };

    record.pki = record.affinity.and_then(pki);
    record.descriptors = cache.get_or_compute(ligand, search_dirs);
    if let Some(affinity) = record.affinity {
        record.efficiency = efficiency_metrics(affinity, record.pki, &record.descriptors);
    }
    Ok(record)
}

/// Processes many logs in parallel. Results come back in input order, one per
/// log, so a missing log does not hide the others.
pub fn compute_records(
    log_files: &[PathBuf],
    search_dirs: &[PathBuf],
    progress: &ProgressBar,
) -> Vec<Result<DockingRecord, DockingError>> {
    let cache = DescriptorCache::new();
    let results = log_files
        .par_iter()
        .map(|log| {
            let result = compute_record(log, search_dirs, &cache);
            progress.inc(1);
            result
        })
        .collect();
    debug!("Descriptor cache holds {} ligand(s)", cache.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ETHANOL_SDF: &str = "\
ethanol
  test

  3  2  0  0  0  0  0  0  0  0999 V2000
   -0.8883    0.1670    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.4658   -0.5022    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.4225    0.5413    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
$$$$
";

    const TABLE_ONLY_LOG: &str = "\
mode |   affinity | dist from best mode
-----+------------+----------+----------
   1       -6.000          0          0
   2       -5.500      1.000      2.000
";

    /// `<root>/<run_dir>/log.txt` plus `<root>/ligands/ethanol.sdf`
    fn setup(root: &Path, run_dir: &str) -> (PathBuf, Vec<PathBuf>) {
        let ligands = root.join("ligands");
        fs::create_dir_all(&ligands).unwrap();
        fs::write(ligands.join("ethanol.sdf"), ETHANOL_SDF).unwrap();

        let run = root.join(run_dir);
        fs::create_dir_all(&run).unwrap();
        let log = run.join("log.txt");
        fs::write(&log, TABLE_ONLY_LOG).unwrap();
        (log, vec![ligands])
    }

    #[test]
    fn full_record_from_directory_names() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, dirs) = setup(tmp.path(), "recA_ethanol");
        let cache = DescriptorCache::new();

        let record = compute_record(&log, &dirs, &cache).unwrap();
        assert_eq!(record.receptor.as_deref(), Some("recA"));
        assert_eq!(record.ligand.as_deref(), Some("ethanol"));
        assert_eq!(record.affinity, Some(-6.0));
        assert!(record.pki.unwrap() > 4.0);

        let d = &record.descriptors;
        assert_eq!(d.nha, Some(3));
        assert_eq!(d.hbd, Some(1));
        assert!(d.sasa.unwrap() > 0.0);
        assert_eq!(record.efficiency.le, Some(2.0));
        assert!(record.efficiency.sile_sasa.is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_ligand_file_leaves_descriptors_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, dirs) = setup(tmp.path(), "recA_unknownlig");
        let record = compute_record(&log, &dirs, &DescriptorCache::new()).unwrap();

        assert_eq!(record.ligand.as_deref(), Some("unknownlig"));
        assert!(record.pki.is_some());
        assert_eq!(record.descriptors, LigandDescriptors::default());
        assert_eq!(record.efficiency.le, None);
        assert_eq!(record.efficiency.lle, None);
    }

    #[test]
    fn unnamed_run_only_has_affinity() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, dirs) = setup(tmp.path(), "nounderscore");
        let record = compute_record(&log, &dirs, &DescriptorCache::new()).unwrap();

        assert_eq!(record.receptor, None);
        assert_eq!(record.affinity, Some(-6.0));
        assert_eq!(record.pki, None);
    }

    #[test]
    fn empty_ligand_name_skips_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, dirs) = setup(tmp.path(), "rec_");
        let cache = DescriptorCache::new();
        let record = compute_record(&log, &dirs, &cache).unwrap();

        assert_eq!(record.receptor.as_deref(), Some("rec"));
        assert_eq!(record.ligand.as_deref(), Some(""));
        assert_eq!(record.affinity, Some(-6.0));
        assert_eq!(record.pki, None);
        assert!(cache.is_empty());
    }

    #[test]
    fn batch_keeps_input_order_and_reports_missing_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let (first, dirs) = setup(tmp.path(), "recA_ethanol");
        let (second, _) = setup(tmp.path(), "recB_ethanol");
        let missing = tmp.path().join("recC_ethanol").join("log.txt");

        let logs = vec![second, missing, first];
        let results = compute_records(&logs, &dirs, &ProgressBar::hidden());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().receptor.as_deref(), Some("recB"));
        assert!(matches!(results[1], Err(DockingError::LogNotFound(_))));
        assert_eq!(results[2].as_ref().unwrap().receptor.as_deref(), Some("recA"));
    }
}
