use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::CalcError;

use super::model::CellValue;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
];

/// Convert a time column to seconds.
///
/// If any cell is numeric the column is taken as numeric (other cells become
/// `NaN`). Otherwise every cell is parsed as a timestamp and expressed as
/// seconds since the earliest one; unparseable cells become `NaN`.
pub fn parse_time_column(name: &str, cells: &[CellValue]) -> Result<Vec<f64>, CalcError> {
    let numeric: Vec<f64> = cells
        .iter()
        .map(|c| c.as_f64().unwrap_or(f64::NAN))
        .collect();
    if numeric.iter().any(|v| !v.is_nan()) {
        return Ok(numeric);
    }

    let stamps: Vec<Option<NaiveDateTime>> = cells
        .iter()
        .map(|c| match c {
            CellValue::Text(s) => parse_timestamp(s),
            _ => None,
        })
        .collect();

    let origin = stamps
        .iter()
        .flatten()
        .min()
        .copied()
        .ok_or_else(|| CalcError::TimeParse(name.to_string()))?;

    log::debug!("time column '{name}' parsed as timestamps from {origin}");

    Ok(stamps
        .iter()
        .map(|s| match s {
            Some(t) => (*t - origin)
                .num_microseconds()
                .map_or(f64::NAN, |us| us as f64 / 1e6),
            None => f64::NAN,
        })
        .collect())
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    // Bare time-of-day, as written by most DAQ loggers.
    let t = NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok()?;
    NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(vals: &[&str]) -> Vec<CellValue> {
        vals.iter().map(|s| CellValue::guess(s)).collect()
    }

    #[test]
    fn numeric_column_passes_through() {
        let t = parse_time_column("t", &cells(&["0.0", "0.5", "junk", "1.5"])).unwrap();
        assert_eq!(t[0], 0.0);
        assert_eq!(t[1], 0.5);
        assert!(t[2].is_nan());
        assert_eq!(t[3], 1.5);
    }

    #[test]
    fn timestamps_become_elapsed_seconds_from_earliest() {
        let t = parse_time_column(
            "Timestamp",
            &cells(&[
                "2024-03-01 12:00:01.5",
                "2024-03-01 12:00:00",
                "bad",
                "2024-03-01 12:00:03.25",
            ]),
        )
        .unwrap();
        assert!((t[0] - 1.5).abs() < 1e-9);
        assert_eq!(t[1], 0.0);
        assert!(t[2].is_nan());
        assert!((t[3] - 3.25).abs() < 1e-9);
    }

    #[test]
    fn rfc3339_and_time_of_day() {
        let t = parse_time_column(
            "time",
            &cells(&["2024-03-01T12:00:00Z", "2024-03-01T12:00:02+00:00"]),
        )
        .unwrap();
        assert_eq!(t, vec![0.0, 2.0]);

        let t = parse_time_column("time", &cells(&["10:15:00.250", "10:15:01"])).unwrap();
        assert!((t[1] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn date_only_values_count_from_midnight() {
        let t = parse_time_column(
            "date",
            &cells(&["2024-03-02", "2024-03-01", "2024-03-01 06:00:00"]),
        )
        .unwrap();
        assert_eq!(t, vec![86_400.0, 0.0, 21_600.0]);
    }

    #[test]
    fn neither_numeric_nor_timestamp_is_an_error() {
        let err = parse_time_column("time", &cells(&["a", "b", ""])).unwrap_err();
        assert_eq!(err, CalcError::TimeParse("time".into()));
    }
}
