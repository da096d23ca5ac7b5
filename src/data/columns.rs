use crate::error::{CalcError, ColumnRole};

// ---------------------------------------------------------------------------
// Column selection: which columns hold time, pressure and tank weight
// ---------------------------------------------------------------------------

/// User-designated columns. Not required to be distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub time: Option<String>,
    pub pressure: Option<String>,
    pub weight: Option<String>,
}

impl ColumnSelection {
    /// Fresh selection pre-filled from column names.
    pub fn detect<S: AsRef<str>>(names: &[S]) -> Self {
        let mut sel = Self::default();
        sel.auto_detect(names);
        sel
    }

    /// Pre-select likely columns by case-insensitive name match.
    ///
    /// Each column is tested as time, then pressure, then weight, and only
    /// counts for the first category it matches. Pressure and weight keep an
    /// existing assignment; time takes the last matching column.
    pub fn auto_detect<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            let lower = name.to_lowercase();
            if lower.contains("time") || lower == "t" {
                self.time = Some(name.to_string());
            } else if lower.contains("pressure") || lower.contains("press") {
                if self.pressure.is_none() {
                    self.pressure = Some(name.to_string());
                }
            } else if (lower.contains("weight") || lower.contains("mass")) && self.weight.is_none() {
                self.weight = Some(name.to_string());
            }
        }
        log::debug!("auto-detected columns: {self:?}");
    }

    pub fn require_time(&self) -> Result<&str, CalcError> {
        non_empty(&self.time).ok_or(CalcError::MissingColumn(ColumnRole::Time))
    }

    pub fn require_pressure(&self) -> Result<&str, CalcError> {
        non_empty(&self.pressure).ok_or(CalcError::MissingColumn(ColumnRole::Pressure))
    }

    pub fn weight(&self) -> Option<&str> {
        non_empty(&self.weight)
    }
}

fn non_empty(col: &Option<String>) -> Option<&str> {
    col.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_typical_daq_headers() {
        let sel = ColumnSelection::detect(&["Time (s)", "Tank Pressure", "Ox Weight"]);
        assert_eq!(sel.time.as_deref(), Some("Time (s)"));
        assert_eq!(sel.pressure.as_deref(), Some("Tank Pressure"));
        assert_eq!(sel.weight.as_deref(), Some("Ox Weight"));
    }

    #[test]
    fn pressure_and_weight_keep_first_match_time_keeps_last() {
        let sel = ColumnSelection::detect(&[
            "time_daq", "PT-1 press", "PT-2 pressure", "mass_a", "weight_b", "t",
        ]);
        assert_eq!(sel.time.as_deref(), Some("t"));
        assert_eq!(sel.pressure.as_deref(), Some("PT-1 press"));
        assert_eq!(sel.weight.as_deref(), Some("mass_a"));
    }

    #[test]
    fn column_matching_time_is_not_considered_for_pressure() {
        let sel = ColumnSelection::detect(&["pressure_time"]);
        assert_eq!(sel.time.as_deref(), Some("pressure_time"));
        assert_eq!(sel.pressure, None);
    }

    #[test]
    fn existing_pressure_assignment_is_kept() {
        let mut sel = ColumnSelection {
            pressure: Some("manual".into()),
            ..Default::default()
        };
        sel.auto_detect(&["Chamber Pressure"]);
        assert_eq!(sel.pressure.as_deref(), Some("manual"));
    }

    #[test]
    fn single_letter_t_only_matches_exactly() {
        let sel = ColumnSelection::detect(&["thrust", "T"]);
        assert_eq!(sel.time.as_deref(), Some("T"));
    }

    #[test]
    fn require_reports_missing_role() {
        let sel = ColumnSelection::default();
        assert_eq!(
            sel.require_time(),
            Err(CalcError::MissingColumn(ColumnRole::Time))
        );
        assert_eq!(
            sel.require_pressure(),
            Err(CalcError::MissingColumn(ColumnRole::Pressure))
        );
        assert_eq!(sel.weight(), None);
    }
}
