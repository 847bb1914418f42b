//! Export derived series to CSV and the run summary to JSON.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

/// One exported day of a derived series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub raw: f64,
    pub average: f64,
    /// Empty when no trend could be fitted.
    pub trend: Option<f64>,
}

/// Write `date,raw,average,trend` rows.
pub fn write_series_csv(path: &Path, rows: &[SeriesRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::invalid_input(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write any serializable summary as pretty JSON.
pub fn write_summary_json<T: Serialize>(path: &Path, summary: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::invalid_input(format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}
