use crate::data::window::TimeWindow;
use crate::error::CalcError;

use super::LBS_TO_KG;

/// First-degree least-squares slope of `y` against `x`.
///
/// Needs at least two points and some spread in `x`.
pub fn linear_slope(x: &[f64], y: &[f64]) -> Result<f64, CalcError> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(CalcError::TooFewSamples { found: n });
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }
    if sxx == 0.0 {
        return Err(CalcError::DegenerateFit);
    }
    Ok(sxy / sxx)
}

/// Mass flow out of a draining tank, kg/s.
///
/// Samples with time inside the window (inclusive) and both time and weight
/// present are fitted with a line; the flow is the negated slope converted
/// from lb/s to kg/s, so a falling weight gives a positive flow.
pub fn mass_flow_from_weight(
    time: &[f64],
    weight_lb: &[f64],
    window: TimeWindow,
) -> Result<f64, CalcError> {
    let (t, w): (Vec<f64>, Vec<f64>) = time
        .iter()
        .zip(weight_lb)
        .filter(|(&t, &w)| window.contains(t) && !w.is_nan())
        .map(|(&t, &w)| (t, w))
        .unzip();

    let slope = linear_slope(&t, &w)?;
    Ok(-slope * LBS_TO_KG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();
        assert!((linear_slope(&x, &y).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn slope_of_noisy_line_is_least_squares() {
        // y = 1, 3, 2 at x = 0, 1, 2  ->  slope 0.5
        let s = linear_slope(&[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0]).unwrap();
        assert!((s - 0.5).abs() < 1e-12);
    }

    #[test]
    fn draining_tank_gives_positive_flow_in_kg() {
        // 2 lb/s drain
        let t: Vec<f64> = (0..=10).map(|i| i as f64 * 0.5).collect();
        let w: Vec<f64> = t.iter().map(|t| 100.0 - 2.0 * t).collect();
        let mdot = mass_flow_from_weight(&t, &w, TimeWindow::new(1.0, 4.0)).unwrap();
        assert!((mdot - 2.0 * LBS_TO_KG).abs() < 1e-9);
    }

    #[test]
    fn only_samples_inside_the_window_are_fitted() {
        // flat before t=2, draining at 1 lb/s after
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];
        let w = [50.0, 50.0, 50.0, 49.0, 48.0];
        let mdot = mass_flow_from_weight(&t, &w, TimeWindow::new(2.0, 4.0)).unwrap();
        assert!((mdot - LBS_TO_KG).abs() < 1e-9);
    }

    #[test]
    fn undefined_below_two_valid_samples() {
        let t = [0.0, 1.0, 2.0];
        let w = [10.0, f64::NAN, 8.0];
        assert_eq!(
            mass_flow_from_weight(&t, &w, TimeWindow::new(5.0, 6.0)),
            Err(CalcError::TooFewSamples { found: 0 })
        );
        assert_eq!(
            mass_flow_from_weight(&t, &w, TimeWindow::new(0.5, 1.5)),
            Err(CalcError::TooFewSamples { found: 0 })
        );
        assert_eq!(
            mass_flow_from_weight(&t, &w, TimeWindow::new(0.0, 1.0)),
            Err(CalcError::TooFewSamples { found: 1 })
        );
        assert!(mass_flow_from_weight(&t, &w, TimeWindow::new(0.0, 2.0))
            .unwrap()
            .is_finite());
    }

    #[test]
    fn missing_time_rows_are_dropped() {
        let t = [0.0, f64::NAN, 2.0];
        let w = [10.0, 0.0, 8.0];
        let mdot = mass_flow_from_weight(&t, &w, TimeWindow::new(0.0, 2.0)).unwrap();
        assert!((mdot - LBS_TO_KG).abs() < 1e-9);
    }

    #[test]
    fn constant_time_is_degenerate() {
        assert_eq!(
            mass_flow_from_weight(&[1.0, 1.0], &[5.0, 4.0], TimeWindow::new(0.0, 2.0)),
            Err(CalcError::DegenerateFit)
        );
    }
}
