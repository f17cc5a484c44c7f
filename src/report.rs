//src/report.rs

use std::io::Write;

use crate::error::DockingError;
use crate::types::{DockingRecord, CSV_HEADER};

/// Placeholder written for every missing value.
pub const MISSING: &str = "NA";

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => MISSING.to_string(),
    }
}

fn count(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

/// Formats a record into the 17 CSV fields, in `CSV_HEADER` order.
pub fn format_record(record: &DockingRecord) -> [String; 17] {
    let d = &record.descriptors;
    let e = &record.efficiency;
    [
        text(&record.receptor),
        text(&record.ligand),
        fixed(record.affinity, 3),
        fixed(record.pki, 2),
        fixed(d.mw, 2),
        fixed(d.logp, 2),
        fixed(d.tpsa, 2),
        count(d.nha),
        count(d.nrb),
        count(d.hbd),
        count(d.hba),
        fixed(d.sasa, 2),
        fixed(d.qed, 2),
        fixed(e.le, 3),
        fixed(e.lle, 2),
        fixed(e.sile_n, 3),
        fixed(e.sile_sasa, 2),
    ]
}

/// CSV writer over any sink. Fields containing commas or quotes are quoted.
pub struct ReportWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        let inner = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
        Self { inner }
    }

    pub fn write_header(&mut self) -> Result<(), DockingError> {
        self.inner.write_record(CSV_HEADER)?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &DockingRecord) -> Result<(), DockingError> {
        self.inner.write_record(format_record(record))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), DockingError> {
        self.inner
            .flush()
            .map_err(|e| DockingError::io("<report output>", e))
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> Result<W, DockingError> {
        self.inner
            .into_inner()
            .map_err(|e| DockingError::io("<report output>", e.into_error()))
    }
}

/// Renders records (optionally preceded by the header) to a CSV string.
pub fn render_csv(records: &[DockingRecord], header: bool) -> Result<String, DockingError> {
    let mut writer = ReportWriter::new(Vec::new());
    if header {
        writer.write_header()?;
    }
    for record in records {
        writer.write_record(record)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EfficiencyMetrics, LigandDescriptors};

    #[test]
    fn empty_record_is_all_na() {
        let line = render_csv(&[DockingRecord::default()], false).unwrap();
        assert_eq!(line.trim_end(), vec!["NA"; 17].join(","));
    }

    #[test]
    fn header_matches_column_order() {
        let out = render_csv(&[], true).unwrap();
        assert_eq!(
            out.trim_end(),
            "Receptor,Ligand,Affinity_kcal_mol,pKi,MW,LogP,TPSA,NHA,NRB,HBD,HBA,SASA_A2,QED,LE,LLE,SILE_N,SILE_SASA"
        );
    }

    #[test]
    fn precisions_per_column() {
        let record = DockingRecord {
            receptor: Some("5HT2A".into()),
            ligand: Some("psilocin".into()),
            affinity: Some(-8.4123),
            pki: Some(6.16666),
            descriptors: LigandDescriptors {
                mw: Some(204.229),
                logp: Some(1.4567),
                tpsa: Some(52.49),
                nha: Some(15),
                nrb: Some(3),
                hbd: Some(2),
                hba: Some(2),
                sasa: None,
                qed: Some(0.7777),
            },
            efficiency: EfficiencyMetrics {
                le: Some(0.56082),
                lle: Some(4.71),
                sile_n: Some(3.58912),
                sile_sasa: None,
            },
        };
        let line = render_csv(&[record], false).unwrap();
        assert_eq!(
            line.trim_end(),
            "5HT2A,psilocin,-8.412,6.17,204.23,1.46,52.49,15,3,2,2,NA,0.78,0.561,4.71,3.589,NA"
        );
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let record = DockingRecord {
            receptor: Some("rec,A".into()),
            ..Default::default()
        };
        let line = render_csv(&[record], false).unwrap();
        assert!(line.starts_with("\"rec,A\",NA"));
    }
}
