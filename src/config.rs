use crate::calc::AMBIENT_PSI;

/// Runtime settings. Edited from the Settings menu, lost on exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Cap on points drawn per series; calculations always use every sample.
    pub max_plot_points: usize,
    /// Value put into P_low by the "Ambient" button, psi.
    pub ambient_psi: f64,
    /// Rows shown in the data explorer table.
    pub preview_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_plot_points: 2000,
            ambient_psi: AMBIENT_PSI,
            preview_rows: 500,
        }
    }
}
