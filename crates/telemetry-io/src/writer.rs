//! Cleaned result export

use crate::reader::TableFormat;
use crate::IoError;
use serde_json::{Map, Value};
use state_filter::{CleanedSeries, Observation};
use std::io::Write;
use tracing::debug;

/// Name of the column holding the cleaned flag
pub const RESULT_COLUMN: &str = "result";

/// One exported row: the input observation plus its cleaned flag
#[derive(Debug, Clone, PartialEq, Eq)]
struct CleanedRecord {
    vehicle_id: String,
    timestamp: String,
    loaded: u8,
    result: u8,
}

impl CleanedRecord {
    /// JSON object keyed by the table's own column names
    fn to_json(&self, format: &TableFormat) -> Value {
        let mut object = Map::new();
        object.insert(
            format.vehicle_column.clone(),
            Value::from(self.vehicle_id.as_str()),
        );
        object.insert(
            format.time_column.clone(),
            Value::from(self.timestamp.as_str()),
        );
        object.insert(format.loaded_column.clone(), Value::from(self.loaded));
        object.insert(RESULT_COLUMN.to_string(), Value::from(self.result));
        Value::Object(object)
    }
}

/// Pair each observation with its cleaned flag, in input order
fn align<'a>(
    observations: &'a [Observation],
    series: &CleanedSeries,
) -> Result<Vec<(&'a Observation, bool)>, IoError> {
    let mismatch = || IoError::LengthMismatch {
        observations: observations.len(),
        cleaned: series.len(),
    };
    if observations.len() != series.len() {
        return Err(mismatch());
    }

    let mut results: Vec<Option<bool>> = vec![None; observations.len()];
    for value in &series.values {
        let slot = results.get_mut(value.position).ok_or_else(mismatch)?;
        *slot = Some(value.loaded);
    }

    observations
        .iter()
        .zip(results)
        .map(|(observation, result)| result.map(|r| (observation, r)).ok_or_else(mismatch))
        .collect()
}

fn records<'a>(
    observations: &'a [Observation],
    series: &CleanedSeries,
    format: &'a TableFormat,
) -> Result<impl Iterator<Item = CleanedRecord> + 'a, IoError> {
    Ok(align(observations, series)?
        .into_iter()
        .map(move |(observation, result)| CleanedRecord {
            vehicle_id: observation.vehicle_id.clone(),
            timestamp: observation
                .timestamp
                .format(&format.datetime_format)
                .to_string(),
            loaded: u8::from(observation.loaded),
            result: u8::from(result),
        }))
}

/// Write the input columns plus a `result` column as CSV
pub fn write_csv<W: Write>(
    writer: W,
    format: &TableFormat,
    observations: &[Observation],
    series: &CleanedSeries,
) -> Result<(), IoError> {
    let rows = records(observations, series, format)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        format.vehicle_column.as_str(),
        format.time_column.as_str(),
        format.loaded_column.as_str(),
        RESULT_COLUMN,
    ])?;

    let mut written = 0;
    for record in rows {
        let loaded = record.loaded.to_string();
        let result = record.result.to_string();
        csv_writer.write_record([
            record.vehicle_id.as_str(),
            record.timestamp.as_str(),
            loaded.as_str(),
            result.as_str(),
        ])?;
        written += 1;
    }
    csv_writer.flush()?;

    debug!("Wrote {} CSV rows", written);
    Ok(())
}

/// Write cleaned records as a JSON array, keyed like the CSV header
pub fn write_json<W: Write>(
    writer: W,
    format: &TableFormat,
    observations: &[Observation],
    series: &CleanedSeries,
) -> Result<(), IoError> {
    let records: Vec<Value> = records(observations, series, format)?
        .map(|record| record.to_json(format))
        .collect();
    serde_json::to_writer_pretty(writer, &records)?;
    debug!("Wrote {} JSON records", records.len());
    Ok(())
}
