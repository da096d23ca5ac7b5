use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by every calculator action
// ---------------------------------------------------------------------------

/// Which user-designated column an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Time,
    Pressure,
    Weight,
    LowPressure,
    Upstream,
    Throat,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnRole::Time => "time",
            ColumnRole::Pressure => "pressure",
            ColumnRole::Weight => "tank weight",
            ColumnRole::LowPressure => "P_low",
            ColumnRole::Upstream => "P₁ (upstream)",
            ColumnRole::Throat => "P₂ (throat)",
        };
        f.write_str(s)
    }
}

/// Coarse grouping used to title the notification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An earlier step (load, column choice, time range) has not happened yet.
    MissingPrerequisite,
    /// A scalar entry is not a number or violates a physical constraint.
    InvalidInput,
    /// The loaded data cannot support the request.
    Data,
}

impl ErrorKind {
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::MissingPrerequisite => "Missing step",
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::Data => "Data error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Please load a data file first.")]
    NoTable,
    #[error("Please select a {0} column.")]
    MissingColumn(ColumnRole),
    #[error("Please select start and end times first using the plot window.")]
    NoTimeRange,
    #[error("Please select a time range with weight data to calculate ṁ first.")]
    NoMassFlow,
    #[error("Please calculate CdA first.")]
    NoCda,
    #[error("Finish or cancel the time-range selection first.")]
    SelectionOpen,

    #[error("{field}: '{text}' is not a valid number.")]
    InvalidNumber { field: &'static str, text: String },
    #[error("{0}")]
    OutOfRange(&'static str),

    #[error("Column '{0}' does not exist in the loaded table.")]
    UnknownColumn(String),
    #[error("Could not parse time column '{0}' as numbers or timestamps.")]
    TimeParse(String),
    #[error("No data in selected time range.")]
    NoSamplesInRange,
    #[error("No valid (non-missing) samples in selected time range.")]
    NoValidSamples,
    #[error("At least 2 valid samples are needed for a fit, found {found}.")]
    TooFewSamples { found: usize },
    #[error("All samples in the selected range share one timestamp.")]
    DegenerateFit,
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        use CalcError::*;
        match self {
            NoTable | MissingColumn(_) | NoTimeRange | NoMassFlow | NoCda | SelectionOpen => {
                ErrorKind::MissingPrerequisite
            }
            InvalidNumber { .. } | OutOfRange(_) => ErrorKind::InvalidInput,
            UnknownColumn(_) | TimeParse(_) | NoSamplesInRange | NoValidSamples
            | TooFewSamples { .. } | DegenerateFit => ErrorKind::Data,
        }
    }
}
