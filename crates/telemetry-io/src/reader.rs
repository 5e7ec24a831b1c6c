//! CSV table reader

use crate::IoError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use state_filter::Observation;
use std::cmp::Ordering;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column layout of a telemetry table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    /// Vehicle identity column
    pub vehicle_column: String,
    /// Timestamp column
    pub time_column: String,
    /// Loaded flag column
    pub loaded_column: String,
    /// chrono format string for the timestamp column
    pub datetime_format: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            vehicle_column: "vehicle_name".to_string(),
            time_column: "datetime".to_string(),
            loaded_column: "loaded".to_string(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

struct Columns {
    vehicle: usize,
    time: usize,
    loaded: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord, format: &TableFormat) -> Result<Self, IoError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| IoError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            vehicle: find(&format.vehicle_column)?,
            time: find(&format.time_column)?,
            loaded: find(&format.loaded_column)?,
        })
    }
}

fn parse_loaded(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    row: u64,
) -> Result<&'r str, IoError> {
    match record.get(idx).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(IoError::Malformed {
            row,
            reason: format!("empty {name}"),
        }),
    }
}

/// Read observations from any CSV source.
///
/// Fails on the first malformed row; no partial table is returned.
pub fn read_observations<R: Read>(
    reader: R,
    format: &TableFormat,
) -> Result<Vec<Observation>, IoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::locate(csv_reader.headers()?, format)?;

    let mut observations = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        let vehicle = field(&record, columns.vehicle, &format.vehicle_column, row)?;
        let time = field(&record, columns.time, &format.time_column, row)?;
        let loaded = field(&record, columns.loaded, &format.loaded_column, row)?;

        let timestamp = NaiveDateTime::parse_from_str(time, &format.datetime_format).map_err(
            |e| IoError::Malformed {
                row,
                reason: format!("timestamp {time:?}: {e}"),
            },
        )?;
        let loaded = parse_loaded(loaded).ok_or_else(|| IoError::Malformed {
            row,
            reason: format!("loaded flag {loaded:?} is not 0/1/true/false"),
        })?;

        observations.push(Observation::new(vehicle, timestamp, loaded));
    }

    debug!("Read {} observations", observations.len());
    Ok(observations)
}

/// Load observations from a CSV file
pub fn load_csv(path: impl AsRef<Path>, format: &TableFormat) -> Result<Vec<Observation>, IoError> {
    let path = path.as_ref();
    info!("Loading telemetry table from {}", path.display());
    read_observations(File::open(path)?, format)
}

/// Sort key for a vehicle id: integer ids first, by value, then the rest by text
fn vehicle_key(id: &str) -> (Option<u64>, &str) {
    (id.parse::<u64>().ok(), id)
}

fn compare_vehicle_ids(a: &str, b: &str) -> Ordering {
    match (vehicle_key(a), vehicle_key(b)) {
        ((Some(x), a), (Some(y), b)) => x.cmp(&y).then_with(|| a.cmp(b)),
        ((Some(_), _), (None, _)) => Ordering::Less,
        ((None, _), (Some(_), _)) => Ordering::Greater,
        ((None, a), (None, b)) => a.cmp(b),
    }
}

/// Order observations by vehicle, then timestamp. Equal keys keep input order.
///
/// Integer vehicle ids compare numerically, so `9` sorts before `10`.
pub fn sort_observations(observations: &mut [Observation]) {
    observations.sort_by(|a, b| {
        compare_vehicle_ids(&a.vehicle_id, &b.vehicle_id)
            .then(a.timestamp.cmp(&b.timestamp))
    });
}
