//src/plots/stats.rs
//! Small numeric helpers behind the charts.

use std::f64::consts::PI;

/// Sample mean and (n-1) standard deviation. None for fewer than two values.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, var.sqrt()))
}

/// Gaussian kernel density estimate with Scott's bandwidth
/// (`std * n^(-1/5)`). Degenerate samples (fewer than two values or zero
/// spread) have no estimate.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    pub fn new(samples: &[f64]) -> Option<Self> {
        let (_, std) = mean_std(samples)?;
        if std <= 0.0 || !std.is_finite() {
            return None;
        }
        let bandwidth = std * (samples.len() as f64).powf(-0.2);
        Some(Self {
            samples: samples.to_vec(),
            bandwidth,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn density(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / ((2.0 * PI).sqrt() * h * self.samples.len() as f64);
        self.samples
            .iter()
            .map(|s| (-0.5 * ((x - s) / h).powi(2)).exp())
            .sum::<f64>()
            * norm
    }

    /// `points` evenly spaced (x, density) pairs over `[lo, hi]`.
    pub fn curve(&self, lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
        let points = points.max(2);
        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, self.density(x))
            })
            .collect()
    }
}

/// Equal-width histogram over the data range. Returns (bin start, bin width,
/// counts); a constant sample gets a single unit-wide bin.
pub fn histogram(values: &[f64], bins: usize) -> Option<(f64, f64, Vec<usize>)> {
    let (lo, hi) = min_max(values)?;
    let bins = bins.max(1);
    if hi - lo <= f64::EPSILON {
        return Some((lo - 0.5, 1.0, vec![values.len()]));
    }
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some((lo, width, counts))
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Data range widened by `fraction` of its span on both sides, or by 0.5 for
/// a constant sample.
pub fn padded_range(values: &[f64], fraction: f64) -> Option<(f64, f64)> {
    let (lo, hi) = min_max(values)?;
    let span = hi - lo;
    if span <= f64::EPSILON {
        return Some((lo - 0.5, hi + 0.5));
    }
    Some((lo - span * fraction, hi + span * fraction))
}

/// Linear-interpolated quantile of sorted data (`q` in [0, 1]).
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Box-plot summary: quartiles plus whiskers at the most extreme points
/// within 1.5 IQR, and the points beyond them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= lo_fence && *v <= hi_fence)
            .collect();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();
        Some(Self {
            q1,
            median,
            q3,
            whisker_low: inside.first().copied().unwrap_or(q1),
            whisker_high: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// Pearson correlation over the positions where both series have a value.
/// None with fewer than two complete pairs or zero variance.
pub fn pearson_pairwise(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Indices of an evenly strided subset of at most `max` out of `len` items,
/// always including the first.
pub fn strided_indices(len: usize, max: usize) -> Vec<usize> {
    if len <= max || max == 0 {
        return (0..len).collect();
    }
    let stride = len as f64 / max as f64;
    (0..max).map(|i| (i as f64 * stride) as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kde_integrates_to_one() {
        let samples = [-9.1, -8.4, -8.0, -7.7, -7.2, -6.9, -6.5];
        let kde = GaussianKde::new(&samples).unwrap();
        let curve = kde.curve(-14.0, -2.0, 2001);
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, y)| y * step).sum();
        assert!((area - 1.0).abs() < 1e-3, "{}", area);
        assert!(GaussianKde::new(&[1.0, 1.0]).is_none());
        assert!(GaussianKde::new(&[1.0]).is_none());
    }

    #[test]
    fn scott_bandwidth() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        let kde = GaussianKde::new(&samples).unwrap();
        let std = 2.5f64.sqrt();
        assert!((kde.bandwidth() - std * 5f64.powf(-0.2)).abs() < 1e-12);
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let (lo, width, counts) = histogram(&[0.0, 1.0, 2.0, 10.0], 5).unwrap();
        assert_eq!(lo, 0.0);
        assert_eq!(width, 2.0);
        assert_eq!(counts, vec![2, 1, 0, 0, 1]);
        assert_eq!(histogram(&[3.0, 3.0], 20).unwrap().2, vec![2]);
        assert!(histogram(&[], 20).is_none());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let b = BoxSummary::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.whisker_high, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn pearson_uses_complete_pairs_only() {
        let xs = [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)];
        let ys = [Some(2.0), Some(4.0), Some(100.0), Some(6.0), None];
        assert!((pearson_pairwise(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let flat = [Some(1.0), Some(1.0), Some(1.0)];
        assert_eq!(pearson_pairwise(&flat, &xs[..3]), None);
    }

    #[test]
    fn strided_subset() {
        assert_eq!(strided_indices(5, 10), vec![0, 1, 2, 3, 4]);
        let idx = strided_indices(3000, 1000);
        assert_eq!(idx.len(), 1000);
        assert_eq!(idx[0], 0);
        assert_eq!(idx[1], 3);
        assert!(*idx.last().unwrap() < 3000);
    }
}
