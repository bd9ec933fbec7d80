//! Small statistics helpers shared by scoring and thresholding.

/// Percentile of a sample with linear interpolation between closest ranks.
///
/// `q` is in [0, 100]. The input need not be sorted; a sorted copy is made
/// internally. Must be called with at least one value.
pub fn percentile(values: &[f32], q: f32) -> f32 {
    debug_assert!(!values.is_empty());
    debug_assert!((0.0..=100.0).contains(&q));

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (q / 100.0) as f64 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = (rank - lo as f64) as f32;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Population mean and standard deviation.
pub fn mean_std(values: &[f32]) -> (f32, f32) {
    debug_assert!(!values.is_empty());

    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean as f32, var.sqrt() as f32)
}

/// Minimum and maximum of a sample.
pub fn min_max(values: &[f32]) -> (f32, f32) {
    debug_assert!(!values.is_empty());

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}
