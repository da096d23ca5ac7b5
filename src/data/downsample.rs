// ---------------------------------------------------------------------------
// Plot decimation. Only ever applied to what is drawn; calculations always
// use the full-resolution columns.
// ---------------------------------------------------------------------------

/// Stride that keeps roughly `max_points` of `n` samples (1 = keep all).
pub fn decimation_step(n: usize, max_points: usize) -> usize {
    if max_points == 0 || n <= max_points {
        1
    } else {
        n / max_points
    }
}

/// Pair `x` and `y` into plot points, dropping rows where either is missing,
/// then keep every `step`-th remaining point.
pub fn plot_points(x: &[f64], y: &[f64], max_points: usize) -> Vec<[f64; 2]> {
    let valid: Vec<[f64; 2]> = x
        .iter()
        .zip(y)
        .filter(|(xi, yi)| !xi.is_nan() && !yi.is_nan())
        .map(|(&xi, &yi)| [xi, yi])
        .collect();
    let step = decimation_step(valid.len(), max_points);
    if step == 1 {
        return valid;
    }
    valid.into_iter().step_by(step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_one_below_the_cap() {
        assert_eq!(decimation_step(10, 2000), 1);
        assert_eq!(decimation_step(2000, 2000), 1);
        assert_eq!(decimation_step(5000, 2000), 2);
        assert_eq!(decimation_step(10_000, 2000), 5);
        assert_eq!(decimation_step(10, 0), 1);
    }

    #[test]
    fn decimates_after_dropping_missing_rows() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut y = x.clone();
        y[1] = f64::NAN;
        let pts = plot_points(&x, &y, 3);
        // 9 valid rows, stride 3 -> rows 0, 3, 6 of the filtered series
        assert_eq!(pts, vec![[0.0, 0.0], [4.0, 4.0], [7.0, 7.0]]);
    }
}
