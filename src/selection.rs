use crate::calc::rate::mass_flow_from_weight;
use crate::data::columns::ColumnSelection;
use crate::data::downsample::plot_points;
use crate::data::model::Table;
use crate::data::window::TimeWindow;
use crate::error::{CalcError, ColumnRole};

// ---------------------------------------------------------------------------
// Two-click time-range protocol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Empty,
    StartSet { start: f64 },
    Complete(TimeWindow),
}

/// First click sets the start, second sets the end (swapping if needed),
/// a third click begins a new pair.
#[derive(Debug, Clone)]
pub struct TimeRangeSelector {
    state: SelectionState,
}

impl Default for TimeRangeSelector {
    fn default() -> Self {
        Self {
            state: SelectionState::Empty,
        }
    }
}

impl TimeRangeSelector {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Register a click at x (time units). Non-finite x is ignored.
    pub fn click(&mut self, x: f64) {
        if !x.is_finite() {
            return;
        }
        self.state = match self.state {
            SelectionState::Empty | SelectionState::Complete(_) => {
                SelectionState::StartSet { start: x }
            }
            SelectionState::StartSet { start } => SelectionState::Complete(TimeWindow::new(start, x)),
        };
        log::debug!("time selection click at {x:.3}: {:?}", self.state);
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::Empty;
    }

    pub fn start(&self) -> Option<f64> {
        match self.state {
            SelectionState::Empty => None,
            SelectionState::StartSet { start } => Some(start),
            SelectionState::Complete(w) => Some(w.start()),
        }
    }

    pub fn end(&self) -> Option<f64> {
        match self.state {
            SelectionState::Complete(w) => Some(w.end()),
            _ => None,
        }
    }

    /// The confirmed-able window, only once both edges are set.
    pub fn window(&self) -> Option<TimeWindow> {
        match self.state {
            SelectionState::Complete(w) => Some(w),
            _ => None,
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.window().is_some()
    }
}

// ---------------------------------------------------------------------------
// Selector session: the data one selector dialog works on
// ---------------------------------------------------------------------------

/// What a confirmed selector hands back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOutcome {
    pub window: TimeWindow,
    /// `None` when no weight column is selected or the fit is undefined.
    pub mass_flow: Option<f64>,
}

/// Full-resolution columns for the rate fit plus decimated plot series.
#[derive(Debug, Clone)]
pub struct SelectorSession {
    pub selector: TimeRangeSelector,
    time: Vec<f64>,
    weight: Option<Vec<f64>>,
    pub pressure_points: Vec<[f64; 2]>,
    pub weight_points: Option<Vec<[f64; 2]>>,
    pub pressure_label: String,
    pub weight_label: Option<String>,
}

impl SelectorSession {
    /// Requires time and pressure columns; weight is optional.
    pub fn prepare(
        table: &Table,
        columns: &ColumnSelection,
        max_plot_points: usize,
    ) -> Result<Self, CalcError> {
        let time_col = columns.require_time()?;
        let pressure_col = columns.require_pressure()?;

        let time = table.time_seconds(time_col)?;
        let pressure = table.numeric(pressure_col)?;
        let weight = columns.weight().map(|w| table.numeric(w)).transpose()?;

        // Plot only rows where both time and pressure exist.
        let keep: Vec<bool> = time
            .iter()
            .zip(&pressure)
            .map(|(t, p)| !t.is_nan() && !p.is_nan())
            .collect();
        if !keep.iter().any(|&k| k) {
            return Err(CalcError::NoValidSamples);
        }
        let masked = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .zip(&keep)
                .filter(|(_, &k)| k)
                .map(|(&v, _)| v)
                .collect()
        };
        let t_plot = masked(&time);
        let pressure_points = plot_points(&t_plot, &masked(&pressure), max_plot_points);
        let weight_points = weight
            .as_deref()
            .map(|w| plot_points(&t_plot, &masked(w), max_plot_points));

        log::info!(
            "selector prepared: {} rows, {} pressure points plotted",
            time.len(),
            pressure_points.len()
        );

        Ok(Self {
            selector: TimeRangeSelector::default(),
            time,
            weight,
            pressure_points,
            weight_points,
            pressure_label: pressure_col.to_string(),
            weight_label: columns.weight().map(str::to_string),
        })
    }

    /// Mass flow over a window using the full-resolution columns.
    pub fn mass_flow(&self, window: TimeWindow) -> Result<f64, CalcError> {
        let weight = self
            .weight
            .as_deref()
            .ok_or(CalcError::MissingColumn(ColumnRole::Weight))?;
        mass_flow_from_weight(&self.time, weight, window)
    }

    /// Result of pressing Confirm, or `None` while the pair is incomplete.
    pub fn confirm(&self) -> Option<SelectionOutcome> {
        let window = self.selector.window()?;
        let mass_flow = match self.mass_flow(window) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("no mass flow for selected range: {e}");
                None
            }
        };
        Some(SelectionOutcome { window, mass_flow })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::LBS_TO_KG;
    use crate::data::loader::load_csv;

    #[test]
    fn two_clicks_complete_a_window() {
        let mut sel = TimeRangeSelector::default();
        assert!(!sel.can_confirm());
        sel.click(1.0);
        assert_eq!(sel.state(), SelectionState::StartSet { start: 1.0 });
        assert!(!sel.can_confirm());
        sel.click(3.0);
        assert_eq!(sel.window(), Some(TimeWindow::new(1.0, 3.0)));
        assert!(sel.can_confirm());
    }

    #[test]
    fn reversed_clicks_are_swapped() {
        for (a, b) in [(5.0, 2.0), (2.0, 5.0), (-1.0, -3.0), (4.0, 4.0)] {
            let mut sel = TimeRangeSelector::default();
            sel.click(a);
            sel.click(b);
            let w = sel.window().unwrap();
            assert!(w.start() <= w.end());
            assert_eq!(w.start(), a.min(b));
            assert_eq!(w.end(), a.max(b));
        }
    }

    #[test]
    fn third_click_starts_a_new_pair() {
        let mut sel = TimeRangeSelector::default();
        sel.click(1.0);
        sel.click(2.0);
        sel.click(7.0);
        assert_eq!(sel.start(), Some(7.0));
        assert_eq!(sel.end(), None);
        assert!(!sel.can_confirm());
        sel.click(6.0);
        assert_eq!(sel.window(), Some(TimeWindow::new(6.0, 7.0)));
    }

    #[test]
    fn reset_and_non_finite_clicks() {
        let mut sel = TimeRangeSelector::default();
        sel.click(f64::NAN);
        assert_eq!(sel.state(), SelectionState::Empty);
        sel.click(1.0);
        sel.reset();
        assert_eq!(sel.state(), SelectionState::Empty);
        assert_eq!(sel.start(), None);
    }

    fn hotfire_table() -> Table {
        let mut csv = String::from("time,pressure,weight\n");
        for i in 0..=20 {
            let t = i as f64 * 0.5;
            let p = if i == 3 { "".to_string() } else { format!("{}", 500.0 - t) };
            csv.push_str(&format!("{t},{p},{}\n", 100.0 - 2.0 * t));
        }
        load_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn session_plots_valid_rows_and_fits_full_data() {
        let table = hotfire_table();
        let cols = ColumnSelection::detect(&table.column_names);
        let mut session = SelectorSession::prepare(&table, &cols, 2000).unwrap();
        assert_eq!(session.pressure_points.len(), 20);
        assert_eq!(session.weight_points.as_ref().map(Vec::len), Some(20));

        assert_eq!(session.confirm(), None);
        session.selector.click(8.0);
        session.selector.click(1.0);
        let outcome = session.confirm().unwrap();
        assert_eq!(outcome.window, TimeWindow::new(1.0, 8.0));
        let mdot = outcome.mass_flow.unwrap();
        assert!((mdot - 2.0 * LBS_TO_KG).abs() < 1e-9);
    }

    #[test]
    fn session_without_weight_confirms_with_undefined_rate() {
        let table = hotfire_table();
        let cols = ColumnSelection {
            time: Some("time".into()),
            pressure: Some("pressure".into()),
            weight: None,
        };
        let mut session = SelectorSession::prepare(&table, &cols, 2000).unwrap();
        assert!(session.weight_points.is_none());
        session.selector.click(0.0);
        session.selector.click(1.0);
        assert_eq!(session.confirm().unwrap().mass_flow, None);
    }

    #[test]
    fn session_requires_time_and_pressure() {
        let table = hotfire_table();
        let cols = ColumnSelection {
            time: Some("time".into()),
            ..Default::default()
        };
        assert_eq!(
            SelectorSession::prepare(&table, &cols, 2000).unwrap_err(),
            CalcError::MissingColumn(ColumnRole::Pressure)
        );
    }
}
