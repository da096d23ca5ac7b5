use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;
use serde::Serialize;

use crate::calc::cda::{
    compute_cda, required_set_pressure, CdaInputs, CdaResult, SetPressureInputs,
    SetPressureResult,
};
use crate::calc::venturi::{mass_flow_series, smooth, summarize, FlowSummary, VenturiParams};
use crate::calc::parse_field;
use crate::color::ChannelColors;
use crate::config::Settings;
use crate::data::columns::ColumnSelection;
use crate::data::model::Table;
use crate::data::window::{index_range, range_mean, window_mean, TimeWindow};
use crate::error::{CalcError, ColumnRole};
use crate::selection::{SelectionOutcome, SelectorSession};

// ---------------------------------------------------------------------------
// Pages and form buffers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Home,
    Cda,
    Venturi,
    Explorer,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Home, Tool::Cda, Tool::Venturi, Tool::Explorer];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Home => "🏠 Home",
            Tool::Cda => "🔢 CdA Calculator",
            Tool::Venturi => "🌀 Venturi ṁ",
            Tool::Explorer => "📊 Data Explorer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureSide {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propellant {
    Oxidizer,
    Fuel,
}

impl Propellant {
    pub fn label(self) -> &'static str {
        match self {
            Propellant::Oxidizer => "Oxidizer",
            Propellant::Fuel => "Fuel",
        }
    }
}

/// Text buffers of the CdA form (values in psi and kg/m³).
#[derive(Debug, Clone, PartialEq)]
pub struct CdaForm {
    pub p_high: String,
    pub p_low: String,
    pub rho: String,
}

impl Default for CdaForm {
    fn default() -> Self {
        Self {
            p_high: String::new(),
            p_low: "14.7".into(),
            rho: "1000".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPressureForm {
    pub cda: String,
    pub mdot: String,
    pub rho: String,
    pub manifold: String,
}

impl Default for SetPressureForm {
    fn default() -> Self {
        Self {
            cda: String::new(),
            mdot: String::new(),
            rho: "1000".into(),
            manifold: "500".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenturiForm {
    pub upstream: Option<String>,
    pub throat: Option<String>,
    pub a1: String,
    pub a2: String,
    pub cd: String,
    pub y: String,
    pub rho: String,
    pub propellant: Propellant,
}

impl Default for VenturiForm {
    fn default() -> Self {
        Self {
            upstream: None,
            throat: None,
            a1: "0.5".into(),
            a2: "0.25".into(),
            cd: "0.98".into(),
            y: "1.0".into(),
            rho: "1141".into(),
            propellant: Propellant::Oxidizer,
        }
    }
}

// ---------------------------------------------------------------------------
// Venturi run: the computed ṁ(t) series and its two-click average
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct VenturiRun {
    pub params: VenturiParams,
    pub time: Vec<f64>,
    pub mdot: Vec<f64>,
    pub summary: Option<FlowSummary>,
    /// Moving-average window, 1 = raw.
    pub smoothing: usize,
    picks: Vec<f64>,
    pub average: Option<(TimeWindow, f64)>,
}

impl VenturiRun {
    pub fn smoothed(&self) -> Vec<f64> {
        smooth(&self.mdot, self.smoothing)
    }

    pub fn picks(&self) -> &[f64] {
        &self.picks
    }

    /// Two clicks bound a range whose raw ṁ is averaged; a third click
    /// clears the previous pair.
    pub fn click(&mut self, x: f64) -> Result<(), CalcError> {
        if !x.is_finite() {
            return Ok(());
        }
        let mut picks = if self.picks.len() == 2 {
            Vec::new()
        } else {
            self.picks.clone()
        };
        picks.push(x);
        let average = match picks[..] {
            [a, b] => {
                let avg = range_mean(&self.mdot, index_range(&self.time, a, b))?;
                log::info!("venturi average over [{:.3}, {:.3}]: {avg:.4} kg/s", a.min(b), a.max(b));
                Some((TimeWindow::new(a, b), avg))
            }
            _ => None,
        };
        self.picks = picks;
        self.average = average;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Misc UI-facing state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl From<&CalcError> for Notice {
    fn from(e: &CalcError) -> Self {
        Notice {
            title: e.kind().title().to_string(),
            message: e.to_string(),
        }
    }
}

/// Pending "Save Plot": the screenshot arrives on a later frame.
#[derive(Debug, Clone)]
pub struct PlotExport {
    pub path: PathBuf,
    pub rect: egui::Rect,
}

#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub table: Table,
}

#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
    pub overlay: BTreeSet<String>,
    pub colors: ChannelColors,
}

#[derive(Serialize)]
struct CdaExport<'a> {
    window: Option<TimeWindow>,
    cda: &'a CdaResult,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every action returns `Err` without touching state when a prerequisite or
/// input is missing; the UI turns the error into a notice.
#[derive(Default)]
pub struct AppState {
    pub settings: Settings,
    pub tool: Tool,

    /// Loaded table (None until user loads a file).
    pub file: Option<LoadedFile>,
    pub columns: ColumnSelection,

    /// Confirmed time range and the mass flow fitted over it.
    pub window: Option<TimeWindow>,
    pub mass_flow: Option<f64>,

    pub cda_form: CdaForm,
    pub last_cda: Option<CdaResult>,
    pub setpoint_form: SetPressureForm,
    pub last_setpoint: Option<SetPressureResult>,

    pub venturi_form: VenturiForm,
    pub venturi: Option<VenturiRun>,

    pub explorer: ExplorerState,

    /// Open time-range selector, if any.
    pub selector: Option<SelectorSession>,
    /// Column picked in the "P_low from column" dialog while it is open.
    pub low_column_dialog: Option<Option<String>>,

    pub notice: Option<Notice>,
    pub pending_export: Option<PlotExport>,
}

impl AppState {
    /// Ingest a newly loaded table; everything derived from the old one is reset.
    pub fn set_table(&mut self, name: String, table: Table) {
        self.columns = ColumnSelection::detect(&table.column_names);
        self.window = None;
        self.mass_flow = None;
        self.last_cda = None;
        self.last_setpoint = None;
        self.venturi = None;
        self.venturi_form.upstream = None;
        self.venturi_form.throat = None;
        self.selector = None;
        self.low_column_dialog = None;
        self.explorer = ExplorerState {
            overlay: BTreeSet::new(),
            colors: ChannelColors::new(&table.numeric_column_names()),
        };
        self.file = Some(LoadedFile { name, table });
    }

    pub fn table(&self) -> Result<&Table, CalcError> {
        self.file.as_ref().map(|f| &f.table).ok_or(CalcError::NoTable)
    }

    /// Show an error to the user.
    pub fn report(&mut self, err: &CalcError) {
        log::error!("{err}");
        self.notice = Some(Notice::from(err));
    }

    /// Actions that read the column mapping or time range wait until an open
    /// selector is confirmed or cancelled.
    fn ensure_no_selection(&self) -> Result<(), CalcError> {
        match self.selector {
            Some(_) => Err(CalcError::SelectionOpen),
            None => Ok(()),
        }
    }

    // ---- time range ----

    pub fn open_selector(&mut self) -> Result<(), CalcError> {
        self.ensure_no_selection()?;
        let session =
            SelectorSession::prepare(self.table()?, &self.columns, self.settings.max_plot_points)?;
        self.selector = Some(session);
        Ok(())
    }

    /// Close the selector; a confirmed outcome replaces the current range.
    pub fn close_selector(&mut self, outcome: Option<SelectionOutcome>) {
        self.selector = None;
        if let Some(outcome) = outcome {
            log::info!(
                "time range confirmed: [{:.3}, {:.3}] s, ṁ = {:?}",
                outcome.window.start(),
                outcome.window.end(),
                outcome.mass_flow
            );
            self.window = Some(outcome.window);
            self.mass_flow = outcome.mass_flow;
        }
    }

    fn windowed_mean(&self, column: &str) -> Result<f64, CalcError> {
        let window = self.window.ok_or(CalcError::NoTimeRange)?;
        let table = self.table()?;
        let time = table.time_seconds(self.columns.require_time()?)?;
        let values = table.numeric(column)?;
        window_mean(&time, &values, window)
    }

    /// Fill P_high or P_low with the pressure column averaged over the range.
    pub fn use_average_pressure(&mut self, side: PressureSide) -> Result<(), CalcError> {
        self.ensure_no_selection()?;
        if self.window.is_none() {
            return Err(CalcError::NoTimeRange);
        }
        let column = self.columns.require_pressure()?.to_string();
        let avg = self.windowed_mean(&column)?;
        let text = format!("{avg:.2}");
        match side {
            PressureSide::High => self.cda_form.p_high = text,
            PressureSide::Low => self.cda_form.p_low = text,
        }
        Ok(())
    }

    /// Open the "P_low from column" dialog once there is data and a range.
    pub fn open_low_column_dialog(&mut self) -> Result<(), CalcError> {
        self.ensure_no_selection()?;
        self.table()?;
        if self.window.is_none() {
            return Err(CalcError::NoTimeRange);
        }
        self.low_column_dialog = Some(None);
        Ok(())
    }

    /// Fill P_low with any column averaged over the range.
    pub fn use_column_average_for_low(&mut self, column: Option<&str>) -> Result<(), CalcError> {
        self.ensure_no_selection()?;
        let column = column.ok_or(CalcError::MissingColumn(ColumnRole::LowPressure))?;
        let avg = self.windowed_mean(column)?;
        self.cda_form.p_low = format!("{avg:.2}");
        Ok(())
    }

    pub fn set_ambient_low(&mut self) {
        self.cda_form.p_low = format!("{}", self.settings.ambient_psi);
    }

    // ---- CdA / set pressure ----

    pub fn calculate_cda(&mut self) -> Result<&CdaResult, CalcError> {
        self.ensure_no_selection()?;
        let p_high = parse_field("P_high (PSI)", &self.cda_form.p_high)?;
        let p_low = parse_field("P_low (PSI)", &self.cda_form.p_low)?;
        let rho = parse_field("Density ρ (kg/m³)", &self.cda_form.rho)?;
        let mdot = self.mass_flow.ok_or(CalcError::NoMassFlow)?;

        let result = compute_cda(CdaInputs {
            mdot,
            p_high,
            p_low,
            rho,
        })?;
        log::info!("CdA = {:.8e} m² (ΔP = {:.0} Pa)", result.cda, result.delta_p);
        Ok(&*self.last_cda.insert(result))
    }

    pub fn copy_cda_to_setpoint(&mut self) -> Result<(), CalcError> {
        let cda = self.last_cda.as_ref().ok_or(CalcError::NoCda)?.cda;
        self.setpoint_form.cda = format!("{cda}");
        Ok(())
    }

    pub fn copy_mdot_to_setpoint(&mut self) -> Result<(), CalcError> {
        self.ensure_no_selection()?;
        let mdot = self.mass_flow.ok_or(CalcError::NoMassFlow)?;
        self.setpoint_form.mdot = format!("{mdot}");
        Ok(())
    }

    pub fn calculate_setpoint(&mut self) -> Result<&SetPressureResult, CalcError> {
        let form = &self.setpoint_form;
        let inputs = SetPressureInputs {
            cda: parse_field("CdA (m²)", &form.cda)?,
            mdot: parse_field("Target ṁ (kg/s)", &form.mdot)?,
            rho: parse_field("Density ρ (kg/m³)", &form.rho)?,
            manifold: parse_field("Manifold P (PSI)", &form.manifold)?,
        };
        let result = required_set_pressure(inputs)?;
        log::info!("P_set = {:.1} psi", result.p_set_psi());
        Ok(&*self.last_setpoint.insert(result))
    }

    /// Last CdA result with the range it came from, as pretty JSON.
    pub fn cda_json(&self) -> anyhow::Result<String> {
        let cda = self.last_cda.as_ref().ok_or(CalcError::NoCda)?;
        let export = CdaExport {
            window: self.window,
            cda,
        };
        serde_json::to_string_pretty(&export).context("serializing CdA result")
    }

    // ---- venturi ----

    pub fn calculate_venturi(&mut self) -> Result<&VenturiRun, CalcError> {
        self.ensure_no_selection()?;
        let table = self.table()?;
        let form = &self.venturi_form;
        let upstream = form
            .upstream
            .as_deref()
            .ok_or(CalcError::MissingColumn(ColumnRole::Upstream))?;
        let throat = form
            .throat
            .as_deref()
            .ok_or(CalcError::MissingColumn(ColumnRole::Throat))?;

        let params = VenturiParams {
            a1: parse_field("A₁ (in²)", &form.a1)?,
            a2: parse_field("A₂ (in²)", &form.a2)?,
            cd: parse_field("Cd", &form.cd)?,
            y: parse_field("Y", &form.y)?,
            rho: parse_field("ρ (kg/m³)", &form.rho)?,
        };
        params.validate()?;

        let time_all = table.time_seconds(self.columns.require_time()?)?;
        let p1_all = table.numeric(upstream)?;
        let p2_all = table.numeric(throat)?;

        let rows: Vec<usize> = (0..time_all.len())
            .filter(|&i| !time_all[i].is_nan())
            .collect();
        let time: Vec<f64> = rows.iter().map(|&i| time_all[i]).collect();
        let p1: Vec<f64> = rows.iter().map(|&i| p1_all[i]).collect();
        let p2: Vec<f64> = rows.iter().map(|&i| p2_all[i]).collect();

        let mdot = mass_flow_series(&p1, &p2, &params)?;
        let summary = summarize(&mdot);
        if let Some(s) = &summary {
            log::info!(
                "venturi ṁ: mean {:.4} kg/s, max {:.4} kg/s over {} rows",
                s.mean_flowing,
                s.max,
                mdot.len()
            );
        }

        let smoothing = self.venturi.as_ref().map_or(1, |v| v.smoothing);
        Ok(&*self.venturi.insert(VenturiRun {
            params,
            time,
            mdot,
            summary,
            smoothing,
            picks: Vec::new(),
            average: None,
        }))
    }

    // ---- explorer ----

    pub fn toggle_overlay(&mut self, column: &str) {
        if !self.explorer.overlay.remove(column) {
            self.explorer.overlay.insert(column.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::LBS_TO_KG;
    use crate::data::loader::load_csv;

    /// 10 s of data at 10 Hz: pressure 500 psi, 2 lb/s drain, venturi pair.
    fn hotfire() -> Table {
        let mut csv = String::from("Time (s),Tank Pressure,Ox Weight,PT-V1,PT-V2\n");
        for i in 0..=100 {
            let t = i as f64 * 0.1;
            csv.push_str(&format!(
                "{t:.1},{},{},{},{}\n",
                500.0,
                100.0 - 2.0 * t,
                100.0,
                80.0
            ));
        }
        load_csv(csv.as_bytes()).unwrap()
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_table("hotfire.csv".into(), hotfire());
        state
    }

    fn select(state: &mut AppState, a: f64, b: f64) {
        state.open_selector().unwrap();
        let session = state.selector.as_mut().unwrap();
        session.selector.click(a);
        session.selector.click(b);
        let outcome = session.confirm();
        state.close_selector(outcome);
    }

    #[test]
    fn actions_need_a_table_first() {
        let mut state = AppState::default();
        assert_eq!(state.open_selector(), Err(CalcError::NoTable));
        assert!(state.selector.is_none());
        state.venturi_form.upstream = Some("a".into());
        state.venturi_form.throat = Some("b".into());
        assert_eq!(state.calculate_venturi().unwrap_err(), CalcError::NoTable);
    }

    #[test]
    fn loading_auto_detects_and_resets() {
        let mut state = loaded();
        assert_eq!(state.columns.time.as_deref(), Some("Time (s)"));
        assert_eq!(state.columns.pressure.as_deref(), Some("Tank Pressure"));
        assert_eq!(state.columns.weight.as_deref(), Some("Ox Weight"));

        select(&mut state, 2.0, 6.0);
        assert!(state.window.is_some());
        state.set_table("other.csv".into(), hotfire());
        assert_eq!(state.window, None);
        assert_eq!(state.mass_flow, None);
    }

    #[test]
    fn confirmed_selection_yields_mass_flow() {
        let mut state = loaded();
        select(&mut state, 6.0, 2.0);
        let w = state.window.unwrap();
        assert_eq!((w.start(), w.end()), (2.0, 6.0));
        assert!((state.mass_flow.unwrap() - 2.0 * LBS_TO_KG).abs() < 1e-9);
    }

    #[test]
    fn cancelled_selection_keeps_previous_range() {
        let mut state = loaded();
        select(&mut state, 1.0, 2.0);
        state.open_selector().unwrap();
        state.selector.as_mut().unwrap().selector.click(5.0);
        state.close_selector(None);
        assert!(state.selector.is_none());
        assert_eq!(state.window, Some(TimeWindow::new(1.0, 2.0)));
    }

    #[test]
    fn cda_flow_end_to_end() {
        let mut state = loaded();
        state.cda_form.p_high = "500".into();
        assert_eq!(state.calculate_cda().unwrap_err(), CalcError::NoMassFlow);

        select(&mut state, 2.0, 6.0);
        state.use_average_pressure(PressureSide::High).unwrap();
        assert_eq!(state.cda_form.p_high, "500.00");

        let cda = state.calculate_cda().unwrap().cda;
        assert!(cda > 0.0);

        state.copy_cda_to_setpoint().unwrap();
        state.copy_mdot_to_setpoint().unwrap();
        state.setpoint_form.manifold = "14.7".into();
        let p_set = state.calculate_setpoint().unwrap().p_set_psi();
        assert!((p_set - 500.0).abs() < 1e-6);

        let json = state.cda_json().unwrap();
        assert!(json.contains("\"cda\""));
        assert!(json.contains("\"window\""));
    }

    #[test]
    fn invalid_entries_leave_results_untouched() {
        let mut state = loaded();
        select(&mut state, 2.0, 6.0);
        state.cda_form.p_high = "five hundred".into();
        assert!(matches!(
            state.calculate_cda(),
            Err(CalcError::InvalidNumber { field: "P_high (PSI)", .. })
        ));
        state.cda_form.p_high = "10".into();
        assert_eq!(
            state.calculate_cda().unwrap_err(),
            CalcError::OutOfRange("P_high must be greater than P_low.")
        );
        assert!(state.last_cda.is_none());
        assert_eq!(state.copy_cda_to_setpoint(), Err(CalcError::NoCda));
    }

    #[test]
    fn averages_need_a_range() {
        let mut state = loaded();
        assert_eq!(
            state.use_average_pressure(PressureSide::Low),
            Err(CalcError::NoTimeRange)
        );
        select(&mut state, 20.0, 30.0);
        assert_eq!(
            state.use_column_average_for_low(Some("PT-V2")),
            Err(CalcError::NoSamplesInRange)
        );
        select(&mut state, 0.0, 1.0);
        state.use_column_average_for_low(Some("PT-V2")).unwrap();
        assert_eq!(state.cda_form.p_low, "80.00");
        state.set_ambient_low();
        assert_eq!(state.cda_form.p_low, "14.7");
    }

    #[test]
    fn venturi_run_and_click_average() {
        let mut state = loaded();
        state.venturi_form.upstream = Some("PT-V1".into());
        assert_eq!(
            state.calculate_venturi().unwrap_err(),
            CalcError::MissingColumn(ColumnRole::Throat)
        );
        state.venturi_form.throat = Some("PT-V2".into());
        let run = state.calculate_venturi().unwrap();
        assert_eq!(run.mdot.len(), 101);
        assert_eq!((run.params.a1, run.params.a2, run.params.cd), (0.5, 0.25, 0.98));
        let expected = 3.237_690_123_66;
        assert!((run.summary.unwrap().max - expected).abs() < 1e-9);

        let run = state.venturi.as_mut().unwrap();
        run.click(3.0).unwrap();
        assert!(run.average.is_none());
        run.click(1.0).unwrap();
        let (w, avg) = run.average.unwrap();
        assert_eq!((w.start(), w.end()), (1.0, 3.0));
        assert!((avg - expected).abs() < 1e-9);
        run.click(5.0).unwrap();
        assert!(run.average.is_none());
        assert_eq!(run.picks(), &[5.0]);
    }

    #[test]
    fn venturi_rejects_bad_geometry() {
        let mut state = loaded();
        state.venturi_form.upstream = Some("PT-V1".into());
        state.venturi_form.throat = Some("PT-V2".into());
        state.venturi_form.a2 = "0.6".into();
        assert_eq!(
            state.calculate_venturi().unwrap_err(),
            CalcError::OutOfRange("A₂ (throat) must be smaller than A₁ (upstream).")
        );
        assert!(state.venturi.is_none());
    }

    #[test]
    fn actions_wait_while_a_selection_is_open() {
        let mut state = loaded();
        select(&mut state, 2.0, 6.0);
        state.cda_form.p_high = "500".into();
        state.open_selector().unwrap();

        assert_eq!(state.open_selector(), Err(CalcError::SelectionOpen));
        assert_eq!(
            state.calculate_cda().unwrap_err(),
            CalcError::SelectionOpen
        );
        assert_eq!(
            state.use_average_pressure(PressureSide::Low),
            Err(CalcError::SelectionOpen)
        );
        assert_eq!(state.open_low_column_dialog(), Err(CalcError::SelectionOpen));
        assert!(state.last_cda.is_none());
        assert_eq!(state.cda_form.p_low, "14.7");

        state.close_selector(None);
        assert!(state.calculate_cda().is_ok());
    }

    #[test]
    fn low_column_dialog_needs_data_and_range() {
        let mut state = AppState::default();
        assert_eq!(state.open_low_column_dialog(), Err(CalcError::NoTable));
        state.set_table("hotfire.csv".into(), hotfire());
        assert_eq!(state.open_low_column_dialog(), Err(CalcError::NoTimeRange));
        assert!(state.low_column_dialog.is_none());
        select(&mut state, 0.0, 1.0);
        state.open_low_column_dialog().unwrap();
        assert_eq!(state.low_column_dialog, Some(None));
    }

    #[test]
    fn failed_venturi_average_keeps_previous_picks() {
        let mut state = loaded();
        state.venturi_form.upstream = Some("PT-V1".into());
        state.venturi_form.throat = Some("PT-V2".into());
        state.calculate_venturi().unwrap();
        let run = state.venturi.as_mut().unwrap();

        run.click(20.0).unwrap();
        assert!(run.click(30.0).is_err());
        assert_eq!(run.picks(), &[20.0]);
        assert!(run.average.is_none());
    }

    #[test]
    fn cda_json_needs_a_result() {
        let state = loaded();
        let err = state.cda_json().unwrap_err();
        assert_eq!(err.downcast_ref::<CalcError>(), Some(&CalcError::NoCda));
    }

    #[test]
    fn overlay_toggles() {
        let mut state = loaded();
        state.toggle_overlay("PT-V1");
        assert!(state.explorer.overlay.contains("PT-V1"));
        state.toggle_overlay("PT-V1");
        assert!(state.explorer.overlay.is_empty());
    }
}
