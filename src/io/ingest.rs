//! Feed JSON ingest.
//!
//! Turns a Sciensano feed (an array of flat objects with upper-case keys) into
//! `RawRecord`s for one measure.
//!
//! - rows must be objects, and a present measure must be numeric (exit code 2)
//! - a missing or null measure counts as 0
//! - rows without a parseable date are kept with `date: None` and counted

use serde_json::{Map, Value};

use crate::dates::parse_iso_date;
use crate::domain::{Measure, RawRecord};
use crate::error::AppError;

/// Ingest output: records plus row counts for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct IngestedRecords {
    pub records: Vec<RawRecord>,
    pub rows_read: usize,
    pub rows_without_date: usize,
}

/// Extract `measure` from every row of its feed.
pub fn records_from_json(value: &Value, measure: Measure) -> Result<IngestedRecords, AppError> {
    let feed = measure.feed();
    let rows = value.as_array().ok_or_else(|| {
        AppError::invalid_input(format!("Feed {} is not a JSON array.", feed.file_name()))
    })?;

    let mut out = IngestedRecords {
        records: Vec::with_capacity(rows.len()),
        ..Default::default()
    };

    for (idx, row) in rows.iter().enumerate() {
        out.rows_read += 1;
        let obj = row.as_object().ok_or_else(|| {
            AppError::invalid_input(format!("Feed {} row {idx} is not an object.", feed.file_name()))
        })?;

        let date = text(obj, feed.date_key()).and_then(parse_iso_date);
        if date.is_none() {
            out.rows_without_date += 1;
        }

        let value = number(obj, measure.column()).map_err(|raw| {
            AppError::invalid_input(
                format!(
                    "Feed {} row {idx}: {} is not numeric ({raw}).",
                    feed.file_name(),
                    measure.column()
                ),
            )
        })?;

        out.records.push(RawRecord {
            date,
            region: feed.region_key().and_then(|k| text(obj, k)).map(str::to_string),
            age_group: feed.age_key().and_then(|k| text(obj, k)).map(str::to_string),
            value,
        });
    }

    Ok(out)
}

fn text<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)?.as_str()
}

/// Numeric column value. The error carries the offending raw value.
fn number(obj: &Map<String, Value>, key: &str) -> Result<f64, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| n.to_string()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(s.clone()),
            }
        }
        Some(other) => Err(other.to_string()),
    }
}
