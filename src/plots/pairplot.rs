//src/plots/pairplot.rs
//! Grid of pairwise scatters over the key metrics, with per-receptor density
//! curves on the diagonal.

use std::error::Error;
use std::path::Path;

use log::info;
use plotters::prelude::*;

use super::stats::{padded_range, strided_indices, GaussianKde};
use super::{receptor_color, Metric, SummaryTable};

const PANEL_PX: u32 = 250;
const KDE_POINTS: usize = 100;

/// A complete row of the pair-plot metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRow {
    pub receptor: String,
    pub values: [f64; 7],
}

/// Rows with every pair-plot metric present, thinned to at most `max_rows`
/// by an even stride.
pub fn pairplot_rows(table: &SummaryTable, max_rows: usize) -> Vec<PairRow> {
    let complete: Vec<PairRow> = table
        .rows
        .iter()
        .filter_map(|row| {
            let mut values = [0.0; 7];
            for (slot, metric) in values.iter_mut().zip(Metric::PAIRPLOT) {
                *slot = metric.value(row)?;
            }
            Some(PairRow {
                receptor: row.receptor().to_string(),
                values,
            })
        })
        .collect();

    if complete.len() > max_rows {
        info!(
            "Pair plot uses {} of {} complete rows",
            max_rows.min(complete.len()),
            complete.len()
        );
    }
    strided_indices(complete.len(), max_rows)
        .into_iter()
        .map(|i| complete[i].clone())
        .collect()
}

fn column(rows: &[PairRow], idx: usize) -> Vec<f64> {
    rows.iter().map(|r| r.values[idx]).collect()
}

pub fn render(rows: &[PairRow], receptors: &[String], out_path: &Path) -> Result<(), Box<dyn Error>> {
    let metrics = Metric::PAIRPLOT;
    let n = metrics.len();
    let ranges: Vec<(f64, f64)> = (0..n)
        .map(|i| padded_range(&column(rows, i), 0.05).unwrap_or((0.0, 1.0)))
        .collect();

    let side = PANEL_PX * n as u32;
    let root = BitMapBackend::new(out_path, (side, side + 40)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Pair Plot of Selected Metrics", ("sans-serif", 24))?;
    let panels = root.split_evenly((n, n));

    for (idx, panel) in panels.iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        let (x_lo, x_hi) = ranges[col];
        let bottom = row == n - 1;
        let left = col == 0;

        if row == col {
            let curves: Vec<(usize, Vec<(f64, f64)>)> = receptors
                .iter()
                .enumerate()
                .filter_map(|(ri, receptor)| {
                    let values: Vec<f64> = rows
                        .iter()
                        .filter(|r| &r.receptor == receptor)
                        .map(|r| r.values[col])
                        .collect();
                    let kde = GaussianKde::new(&values)?;
                    Some((ri, kde.curve(x_lo, x_hi, KDE_POINTS)))
                })
                .collect();
            let y_max = curves
                .iter()
                .flat_map(|(_, c)| c.iter().map(|p| p.1))
                .fold(0.0f64, f64::max)
                .max(1e-9)
                * 1.1;

            let mut chart = ChartBuilder::on(panel)
                .margin(4)
                .x_label_area_size(if bottom { 30 } else { 0 })
                .y_label_area_size(if left { 45 } else { 0 })
                .build_cartesian_2d(x_lo..x_hi, 0.0..y_max)?;
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh().x_labels(4).y_labels(4);
            if bottom {
                mesh.x_desc(metrics[col].column());
            }
            mesh.draw()?;

            for (ri, curve) in curves {
                chart.draw_series(LineSeries::new(curve, receptor_color(ri).stroke_width(2)))?;
            }
        } else {
            let (y_lo, y_hi) = ranges[row];
            let mut chart = ChartBuilder::on(panel)
                .margin(4)
                .x_label_area_size(if bottom { 30 } else { 0 })
                .y_label_area_size(if left { 45 } else { 0 })
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh().x_labels(4).y_labels(4);
            if bottom {
                mesh.x_desc(metrics[col].column());
            }
            if left {
                mesh.y_desc(metrics[row].column());
            }
            mesh.draw()?;

            for (ri, receptor) in receptors.iter().enumerate() {
                let color = receptor_color(ri).mix(0.6);
                chart.draw_series(
                    rows.iter()
                        .filter(|r| &r.receptor == receptor)
                        .map(|r| Circle::new((r.values[col], r.values[row]), 2, color.filled())),
                )?;
            }
        }
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::SummaryRow;

    fn full_row(receptor: &str, affinity: f64) -> SummaryRow {
        SummaryRow {
            receptor: Some(receptor.into()),
            ligand: Some("lig".into()),
            affinity: Some(affinity),
            pki: Some(-affinity / 1.364),
            mw: Some(300.0),
            logp: Some(2.0),
            le: Some(0.4),
            sile_sasa: Some(0.02),
            qed: Some(0.6),
            ..Default::default()
        }
    }

    #[test]
    fn incomplete_rows_are_dropped() {
        let mut partial = full_row("r", -7.0);
        partial.qed = None;
        let table = SummaryTable {
            rows: vec![full_row("r", -8.0), partial, full_row("s", -6.0)],
        };
        let rows = pairplot_rows(&table, 1000);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values[0], -8.0);
        assert_eq!(rows[1].receptor, "s");
        assert_eq!(rows[1].values[6], 0.6);
    }

    #[test]
    fn large_tables_are_thinned() {
        let table = SummaryTable {
            rows: (0..25).map(|i| full_row("r", -5.0 - i as f64 * 0.1)).collect(),
        };
        let rows = pairplot_rows(&table, 10);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].values[0], -5.0);
    }
}
