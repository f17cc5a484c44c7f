//src/plots/charts.rs

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use super::stats::{histogram, padded_range, pearson_pairwise, BoxSummary, GaussianKde};
use super::{receptor_color, Metric, SummaryTable};

const FONT: &str = "sans-serif";
const AFFINITY_BINS: usize = 20;
const KDE_POINTS: usize = 200;
const AFFINITY_LABEL: &str = "Affinity (kcal/mol)";

/// One receptor-coloured scatter chart.
#[derive(Debug, Clone, Copy)]
pub struct ScatterSpec {
    pub x: Metric,
    pub y: Metric,
    pub file_name: &'static str,
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    /// Skip the chart instead of drawing empty axes
    pub skip_when_empty: bool,
}

pub const SCATTERS: [ScatterSpec; 4] = [
    ScatterSpec {
        x: Metric::Mw,
        y: Metric::Affinity,
        file_name: "affinity_vs_mw.png",
        title: "Affinity vs. Molecular Weight",
        x_desc: "Molecular Weight (Da)",
        y_desc: AFFINITY_LABEL,
        skip_when_empty: false,
    },
    ScatterSpec {
        x: Metric::LogP,
        y: Metric::Pki,
        file_name: "pki_vs_logp.png",
        title: "pKi vs. LogP",
        x_desc: "LogP",
        y_desc: "pKi",
        skip_when_empty: true,
    },
    ScatterSpec {
        x: Metric::Affinity,
        y: Metric::Le,
        file_name: "le_vs_affinity.png",
        title: "Ligand Efficiency (LE) vs. Affinity",
        x_desc: AFFINITY_LABEL,
        y_desc: "LE (Affinity / NHA)",
        skip_when_empty: true,
    },
    ScatterSpec {
        x: Metric::Pki,
        y: Metric::SileSasa,
        file_name: "sile_sasa_vs_pki.png",
        title: "Surface Ligand Efficiency (SILE_SASA) vs. pKi",
        x_desc: "pKi",
        y_desc: "SILE_SASA (pKi / SASA)",
        skip_when_empty: true,
    },
];

/// Histogram of all affinities with a KDE curve scaled to counts.
pub fn affinity_distribution(table: &SummaryTable, out_path: &Path) -> Result<(), Box<dyn Error>> {
    let values: Vec<f64> = table.rows.iter().filter_map(|r| r.affinity).collect();
    let (lo, width, counts) = histogram(&values, AFFINITY_BINS).ok_or("no affinity values")?;
    let hi = lo + width * counts.len() as f64;

    let kde_curve: Vec<(f64, f64)> = GaussianKde::new(&values)
        .map(|kde| {
            let scale = values.len() as f64 * width;
            kde.curve(lo, hi, KDE_POINTS)
                .into_iter()
                .map(|(x, d)| (x, d * scale))
                .collect()
        })
        .unwrap_or_default();

    let y_max = counts
        .iter()
        .map(|c| *c as f64)
        .chain(kde_curve.iter().map(|(_, y)| *y))
        .fold(1.0f64, f64::max);

    let root = BitMapBackend::new(out_path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Docking Affinity Scores (All Pairs)", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0.0..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .x_desc(AFFINITY_LABEL)
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, count)| {
        let x0 = lo + width * i as f64;
        Rectangle::new([(x0, 0.0), (x0 + width, *count as f64)], BLUE.mix(0.5).filled())
    }))?;
    if !kde_curve.is_empty() {
        chart.draw_series(LineSeries::new(kde_curve, BLUE.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}

/// One box per receptor, receptors in alphabetical order.
pub fn affinity_boxplot(table: &SummaryTable, out_path: &Path) -> Result<(), Box<dyn Error>> {
    let receptors = table.receptors();
    let groups: Vec<(&String, Quartiles)> = receptors
        .iter()
        .filter_map(|receptor| {
            let values: Vec<f64> = table
                .rows
                .iter()
                .filter(|r| r.receptor() == receptor)
                .filter_map(|r| r.affinity)
                .collect();
            (!values.is_empty()).then(|| (receptor, Quartiles::new(&values)))
        })
        .collect();

    let all: Vec<f64> = table.rows.iter().filter_map(|r| r.affinity).collect();
    let (lo, hi) = padded_range(&all, 0.05).ok_or("no affinity values")?;

    let width = (receptors.len() as u32 * 200).clamp(400, 1500);
    let root = BitMapBackend::new(out_path, (width, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Affinity Scores Distribution per Receptor", (FONT, 20))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(receptors[..].into_segmented(), (lo as f32)..(hi as f32))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Receptor")
        .y_desc(AFFINITY_LABEL)
        .draw()?;

    chart.draw_series(groups.iter().enumerate().map(|(i, (receptor, quartiles))| {
        Boxplot::new_vertical(SegmentValue::CenterOf(*receptor), quartiles)
            .width(30)
            .whisker_width(0.5)
            .style(receptor_color(i))
    }))?;

    // Points beyond the whiskers, matching the usual 1.5 IQR convention
    for (receptor, _) in &groups {
        let values: Vec<f64> = table
            .rows
            .iter()
            .filter(|r| r.receptor() == receptor.as_str())
            .filter_map(|r| r.affinity)
            .collect();
        if let Some(summary) = BoxSummary::new(&values) {
            chart.draw_series(summary.outliers.iter().map(|v| {
                Circle::new((SegmentValue::CenterOf(*receptor), *v as f32), 3, BLACK.filled())
            }))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Horizontal bars of the `top_n` strongest binders of one receptor, the
/// best ligand at the top.
pub fn top_ligands(
    table: &SummaryTable,
    receptor: &str,
    top_n: usize,
    out_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut hits: Vec<(String, f64)> = table
        .rows
        .iter()
        .filter(|r| r.receptor() == receptor)
        .filter_map(|r| Some((r.ligand().to_string(), r.affinity?)))
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits.truncate(top_n);
    if hits.is_empty() {
        return Err(format!("no data to plot for receptor {}", receptor).into());
    }

    // Segments run bottom-up, so the weakest of the top N goes first
    let ligands: Vec<String> = hits.iter().rev().map(|(name, _)| name.clone()).collect();
    let min_affinity = hits.iter().map(|h| h.1).fold(0.0f64, f64::min);
    let max_affinity = hits.iter().map(|h| h.1).fold(0.0f64, f64::max);
    let span = (max_affinity - min_affinity).max(1.0);

    let height = (hits.len() as u32 * 50).max(500);
    let root = BitMapBackend::new(out_path, (1000, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Top {} Ligands for Receptor {} by Affinity", hits.len(), receptor),
            (FONT, 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(160)
        .build_cartesian_2d(
            (min_affinity - span * 0.05)..(max_affinity + span * 0.05),
            ligands[..].into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(AFFINITY_LABEL)
        .y_desc("Ligand")
        .draw()?;

    let by_name: Vec<(&String, f64)> = ligands
        .iter()
        .map(|name| {
            let affinity = hits
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, a)| *a)
                .unwrap_or_default();
            (name, affinity)
        })
        .collect();
    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(GREEN.mix(0.7).filled())
            .margin(8)
            .data(by_name),
    )?;

    root.present()?;
    Ok(())
}

/// Receptor-coloured scatter of `spec.y` against `spec.x`.
pub fn scatter(table: &SummaryTable, spec: &ScatterSpec, out_path: &Path) -> Result<(), Box<dyn Error>> {
    let groups = table.points_by_receptor(spec.x, spec.y);
    let xs: Vec<f64> = groups.iter().flat_map(|(_, p)| p.iter().map(|q| q.0)).collect();
    let ys: Vec<f64> = groups.iter().flat_map(|(_, p)| p.iter().map(|q| q.1)).collect();
    let (x_lo, x_hi) = padded_range(&xs, 0.05).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = padded_range(&ys, 0.05).unwrap_or((0.0, 1.0));

    let root = BitMapBackend::new(out_path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .draw()?;

    for (i, (receptor, points)) in groups.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = receptor_color(i);
        chart
            .draw_series(
                points
                    .iter()
                    .map(move |&(x, y)| Circle::new((x, y), 4, color.mix(0.7).filled())),
            )?
            .label(receptor.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Diverging blue-white-red colour for a correlation in [-1, 1].
pub(crate) fn coolwarm(r: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);
    let t = r.clamp(-1.0, 1.0);
    let (from, to, f) = if t < 0.0 { (MID, COLD, -t) } else { (MID, WARM, t) };
    let lerp = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Pairwise-complete correlation matrix of all numeric columns.
pub fn correlation_matrix(table: &SummaryTable) -> Vec<Vec<Option<f64>>> {
    let columns: Vec<Vec<Option<f64>>> = Metric::ALL.iter().map(|m| table.values(*m)).collect();
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson_pairwise(a, b)).collect())
        .collect()
}

pub fn correlation_heatmap(table: &SummaryTable, out_path: &Path) -> Result<(), Box<dyn Error>> {
    let matrix = correlation_matrix(table);
    let names: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
    let n = names.len() as i32;

    let (width, height) = (1200u32, 1000u32);
    let (x_label_area, y_label_area) = (80u32, 140u32);
    let cell_w = (width - y_label_area - 20) as i32 / n;
    let cell_h = (height - x_label_area - 60) as i32 / n;

    let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix of Calculated Metrics", (FONT, 22))
        .margin(10)
        .x_label_area_size(x_label_area)
        .y_label_area_size(y_label_area)
        .build_cartesian_2d(0i32..n, 0i32..n)?;

    // Row 0 of the matrix is drawn at the top
    let x_label = |v: &i32| names.get(*v as usize).map(|s| s.to_string()).unwrap_or_default();
    let y_label = |v: &i32| {
        names
            .get((n - 1 - *v) as usize)
            .map(|s| s.to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n as usize)
        .y_labels(n as usize)
        .x_label_offset(cell_w / 2)
        .y_label_offset(-cell_h / 2)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style((FONT, 13))
        .draw()?;

    let cells = matrix.iter().enumerate().flat_map(|(row, values)| {
        values
            .iter()
            .enumerate()
            .map(move |(col, value)| (col as i32, n - 1 - row as i32, *value))
    });
    chart.draw_series(cells.clone().map(|(x, y, value)| {
        let fill = match value {
            Some(r) => coolwarm(r).filled(),
            None => RGBColor(240, 240, 240).filled(),
        };
        Rectangle::new([(x, y), (x + 1, y + 1)], fill)
    }))?;
    chart.draw_series(
        cells
            .clone()
            .map(|(x, y, _)| Rectangle::new([(x, y), (x + 1, y + 1)], BLACK.stroke_width(1))),
    )?;
    chart.draw_series(cells.filter_map(|(x, y, value)| {
        let r = value?;
        let text_color = if r.abs() > 0.6 { WHITE } else { BLACK };
        Some(
            EmptyElement::at((x, y + 1))
                + Text::new(
                    format!("{:.2}", r),
                    (cell_w / 2 - 14, cell_h / 2 - 7),
                    (FONT, 13).into_font().color(&text_color),
                ),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::SummaryRow;

    fn row(receptor: &str, affinity: f64, mw: Option<f64>) -> SummaryRow {
        SummaryRow {
            receptor: Some(receptor.into()),
            ligand: Some(format!("lig{}", affinity)),
            affinity: Some(affinity),
            mw,
            ..Default::default()
        }
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let table = SummaryTable {
            rows: vec![
                row("a", -7.0, Some(200.0)),
                row("a", -8.0, Some(300.0)),
                row("b", -9.0, Some(400.0)),
            ],
        };
        let m = correlation_matrix(&table);
        assert_eq!(m.len(), 15);
        // affinity vs MW is perfectly anti-correlated
        assert!((m[0][2].unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(m[0][2], m[2][0]);
        assert!((m[0][0].unwrap() - 1.0).abs() < 1e-12);
        // pKi is absent everywhere
        assert_eq!(m[1][0], None);
    }
}
