use std::ops::Range;

use serde::Serialize;

use crate::error::CalcError;

// ---------------------------------------------------------------------------
// Time window: inclusive [start, end] in the table's time units
// ---------------------------------------------------------------------------

/// A selected time range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Build a window from two edges in any order.
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            TimeWindow { start: b, end: a }
        } else {
            TimeWindow { start: a, end: b }
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Indices of rows whose time falls inside the window. `NaN` times never match.
pub fn window_indices(time: &[f64], window: TimeWindow) -> Vec<usize> {
    time.iter()
        .enumerate()
        .filter(|(_, &t)| window.contains(t))
        .map(|(i, _)| i)
        .collect()
}

/// Mean of the non-missing `values` whose time lies in the window.
pub fn window_mean(time: &[f64], values: &[f64], window: TimeWindow) -> Result<f64, CalcError> {
    let idx = window_indices(time, window);
    if idx.is_empty() {
        return Err(CalcError::NoSamplesInRange);
    }
    let valid: Vec<f64> = idx
        .iter()
        .filter_map(|&i| values.get(i).copied())
        .filter(|v| !v.is_nan())
        .collect();
    if valid.is_empty() {
        return Err(CalcError::NoValidSamples);
    }
    Ok(valid.iter().sum::<f64>() / valid.len() as f64)
}

// ---------------------------------------------------------------------------
// Index ranges on a sorted time axis
// ---------------------------------------------------------------------------

/// Rows covered by a click pair on a sorted time axis.
///
/// Both edges are located with a left-side binary search; the range includes
/// the row at the upper edge and is clamped to the series length.
pub fn index_range(sorted_time: &[f64], a: f64, b: f64) -> Range<usize> {
    let (lo, hi) = if b < a { (b, a) } else { (a, b) };
    let first = sorted_time.partition_point(|&t| t < lo);
    let last = sorted_time.partition_point(|&t| t < hi);
    let end = (last + 1).min(sorted_time.len());
    first.min(end)..end
}

/// Mean of `values[range]`, ignoring `NaN`.
pub fn range_mean(values: &[f64], range: Range<usize>) -> Result<f64, CalcError> {
    let slice = values.get(range).unwrap_or(&[]);
    if slice.is_empty() {
        return Err(CalcError::NoSamplesInRange);
    }
    let valid: Vec<f64> = slice.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return Err(CalcError::NoValidSamples);
    }
    Ok(valid.iter().sum::<f64>() / valid.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_orders_edges() {
        let w = TimeWindow::new(5.0, 2.0);
        assert_eq!((w.start(), w.end()), (2.0, 5.0));
        assert!(w.contains(2.0));
        assert!(w.contains(5.0));
        assert!(!w.contains(5.0001));
        assert!(!w.contains(f64::NAN));
    }

    #[test]
    fn mean_over_window_skips_missing_values() {
        let t = [0.0, 1.0, 2.0, 3.0, f64::NAN];
        let p = [100.0, 200.0, f64::NAN, 400.0, 999.0];
        let m = window_mean(&t, &p, TimeWindow::new(1.0, 3.0)).unwrap();
        assert_eq!(m, 300.0);
    }

    #[test]
    fn mean_errors_distinguish_empty_from_all_missing() {
        let t = [0.0, 1.0];
        let p = [f64::NAN, f64::NAN];
        assert_eq!(
            window_mean(&t, &p, TimeWindow::new(5.0, 6.0)),
            Err(CalcError::NoSamplesInRange)
        );
        assert_eq!(
            window_mean(&t, &p, TimeWindow::new(0.0, 1.0)),
            Err(CalcError::NoValidSamples)
        );
    }

    #[test]
    fn index_range_uses_left_search_and_includes_upper_row() {
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(index_range(&t, 1.5, 3.0), 2..4);
        assert_eq!(index_range(&t, 3.0, 1.5), 2..4);
        assert_eq!(index_range(&t, 3.5, 10.0), 4..5);
        assert_eq!(index_range(&t, 10.0, 20.0), 5..5);
        assert_eq!(index_range(&t, -5.0, -1.0), 0..1);
    }

    #[test]
    fn range_mean_of_empty_range_is_an_error() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(range_mean(&v, 0..2), Ok(1.5));
        assert_eq!(range_mean(&v, 3..3), Err(CalcError::NoSamplesInRange));
    }
}
