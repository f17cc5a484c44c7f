// src/lib.rs
pub mod types;
pub mod error;
pub mod config;
pub mod textio;
pub mod vina_log;
pub mod molecule;
pub mod descriptors;
pub mod efficiency;
pub mod report;
pub mod pipeline;
pub mod plots;

use std::path::PathBuf;

use indicatif::ProgressBar;
use log::error;

pub use crate::config::{default_ligand_dirs, PlotConfig};
pub use crate::error::DockingError;
pub use crate::pipeline::{compute_record, compute_records, DescriptorCache};
pub use crate::plots::run_all;
pub use crate::report::{render_csv, ReportWriter};
pub use crate::types::{DockingRecord, EfficiencyMetrics, LigandDescriptors, CSV_HEADER};

/// Outcome of a batch of Vina logs. Records keep the input order; logs that
/// could not be processed are listed separately.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub records: Vec<DockingRecord>,
    pub failed_logs: Vec<PathBuf>,
}

impl BatchSummary {
    /// CSV text of all records, optionally preceded by the header line.
    pub fn to_csv(&self, header: bool) -> Result<String, DockingError> {
        render_csv(&self.records, header)
    }

    pub fn is_complete(&self) -> bool {
        self.failed_logs.is_empty()
    }
}

/// Summarizes every log in `log_files`, looking ligands up in `search_dirs`.
/// Failed logs are logged and collected rather than aborting the batch.
pub fn summarize_logs(log_files: &[PathBuf], search_dirs: &[PathBuf], progress: &ProgressBar) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for (log, result) in log_files.iter().zip(compute_records(log_files, search_dirs, progress)) {
        match result {
            Ok(record) => summary.records.push(record),
            Err(e) => {
                error!("{}", e);
                summary.failed_logs.push(log.clone());
            }
        }
    }
    summary
}
