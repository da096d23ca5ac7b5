use std::fmt;

use crate::error::CalcError;

use super::time::parse_time_column;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a CSV/Parquet column can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Guess the cell type from raw text (empty → Null).
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(s.to_string()),
        }
    }

    /// Numeric view of the cell. Text, booleans, nulls and NaN are missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded file, column-oriented
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

/// Rows × named columns, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    /// Column names in file order.
    pub column_names: Vec<String>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns. Short columns are padded with `Null`.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
        for col in &mut columns {
            col.cells.resize(n_rows, CellValue::Null);
        }
        let column_names = columns.iter().map(|c| c.name.clone()).collect();
        Table {
            columns,
            column_names,
            n_rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column(&self, name: &str) -> Result<&Column, CalcError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CalcError::UnknownColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col)?.cells.get(row)
    }

    /// Column coerced to `f64`; non-numeric cells become `NaN`.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>, CalcError> {
        Ok(self
            .column(name)?
            .cells
            .iter()
            .map(|c| c.as_f64().unwrap_or(f64::NAN))
            .collect())
    }

    /// Time column in seconds: numeric values as-is, otherwise timestamps
    /// converted to seconds elapsed since the earliest one.
    pub fn time_seconds(&self, name: &str) -> Result<Vec<f64>, CalcError> {
        parse_time_column(name, &self.column(name)?.cells)
    }

    /// Names of columns holding at least one numeric cell.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.cells.iter().any(|v| v.as_f64().is_some()))
            .map(|c| c.name.clone())
            .collect()
    }
}
