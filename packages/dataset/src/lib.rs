#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the four pothole datasets from a data directory.
//!
//! Each CSV is read into a header-keyed [`table::RawTable`], then mapped
//! onto the typed rows from [`pothole_assistant_dataset_models`]. Bad
//! numbers and timestamps are coerced to `None` at this boundary so that
//! the query engine only ever sees clean, typed values.

pub mod parsing;
pub mod table;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use pothole_assistant_dataset_models::{
    BusStop, ComplaintRecord, ComplaintTable, Datasets, PavementSegment, WeatherRecord,
};
use thiserror::Error;

use crate::parsing::{non_empty, parse_f64, parse_timestamp};
use crate::table::{RawTable, read_table};

/// Default data directory when neither the CLI nor the environment sets one.
pub const DEFAULT_DATA_DIR: &str = "data";

/// 311 complaints export.
pub const COMPLAINTS_FILE: &str = "311_Data_Cleaned.csv";
/// Pavement condition index export.
pub const PAVEMENT_FILE: &str = "COSA_pavement_311.csv";
/// Weather observations joined to pothole dates.
pub const WEATHER_FILE: &str = "Potholes_Weather.csv";
/// Street improvement inventory, which carries the bus stops.
pub const STREET_FILE: &str = "Street_IMP_Cleaned.csv";

/// Canonical street column for complaints.
pub const COMPLAINT_STREET_COLUMN: &str = "Street";
/// Council district column, optional in the complaints export.
pub const COUNCIL_DISTRICT_COLUMN: &str = "Council District";

/// Errors that can occur while loading datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Opening or reading a file failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file parsed but its shape is unusable.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A column the loader depends on is absent.
    #[error("{dataset} is missing required column '{column}'")]
    MissingColumn {
        /// Dataset name.
        dataset: String,
        /// Missing column header.
        column: String,
    },
}

/// Resolves the data directory from `POTHOLE_DATA_DIR`, falling back to
/// [`DEFAULT_DATA_DIR`].
#[must_use]
pub fn data_dir_from_env() -> PathBuf {
    std::env::var("POTHOLE_DATA_DIR")
        .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
}

/// Loads all four datasets from `dir`.
///
/// # Errors
///
/// Returns [`DatasetError`] if any file is missing, unreadable, or lacks a
/// required column.
pub fn load_from_dir(dir: &Path) -> Result<Datasets, DatasetError> {
    log::info!("Loading pothole datasets from {}", dir.display());

    let complaints = load_complaints(open(&dir.join(COMPLAINTS_FILE))?)?;
    let pavement = load_pavement(open(&dir.join(PAVEMENT_FILE))?)?;
    let weather = load_weather(open(&dir.join(WEATHER_FILE))?)?;
    let bus_stops = load_bus_stops(open(&dir.join(STREET_FILE))?)?;

    log::info!(
        "Loaded {} complaints, {} pavement segments, {} bus stops, {} weather rows",
        complaints.len(),
        pavement.len(),
        bus_stops.len(),
        weather.len()
    );

    Ok(Datasets::new(complaints, pavement, bus_stops, weather))
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn cell<'a>(row: &'a std::collections::BTreeMap<String, String>, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str)
}

/// Loads the complaints table.
///
/// Requires the street and timestamp columns; coordinates and the council
/// district column are optional.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed or a required column is
/// missing.
pub fn load_complaints(reader: impl Read) -> Result<ComplaintTable, DatasetError> {
    let table = read_table("complaints", reader)?;
    table.require_columns(
        "complaints",
        &[COMPLAINT_STREET_COLUMN, "OPENEDDATETIME", "CLOSEDDATETIME"],
    )?;

    let has_council_district = table.has_column(COUNCIL_DISTRICT_COLUMN);
    let records: Vec<ComplaintRecord> = table
        .rows
        .iter()
        .map(|row| ComplaintRecord {
            street_name: non_empty(cell(row, COMPLAINT_STREET_COLUMN)),
            council_district: non_empty(cell(row, COUNCIL_DISTRICT_COLUMN))
                .map(|d| normalize_district(&d)),
            latitude: parse_f64(cell(row, "Latitude")),
            longitude: parse_f64(cell(row, "Longitude")),
            opened_at: parse_timestamp(cell(row, "OPENEDDATETIME")),
            closed_at: parse_timestamp(cell(row, "CLOSEDDATETIME")),
        })
        .collect();

    log_coercions(&table, &records);

    Ok(ComplaintTable::new(records, has_council_district))
}

/// Districts export as floats (`"3.0"`) when the column has gaps.
fn normalize_district(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.is_finite() => format!("{v:.0}"),
        _ => raw.to_string(),
    }
}

fn log_coercions(table: &RawTable, records: &[ComplaintRecord]) {
    let missing_coords = records.iter().filter(|r| r.location().is_none()).count();
    let missing_opened = records.iter().filter(|r| r.opened_at.is_none()).count();

    if missing_coords > 0 {
        log::warn!(
            "complaints: {missing_coords} of {} rows have no usable coordinates",
            table.rows.len()
        );
    }
    if missing_opened > 0 {
        log::warn!(
            "complaints: {missing_opened} of {} rows have no usable open timestamp",
            table.rows.len()
        );
    }
}

/// Loads the pavement condition table.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed or lacks `MSAG_Name`
/// or `PCI`.
pub fn load_pavement(reader: impl Read) -> Result<Vec<PavementSegment>, DatasetError> {
    let table = read_table("pavement", reader)?;
    table.require_columns("pavement", &["MSAG_Name", "PCI"])?;

    Ok(table
        .rows
        .iter()
        .map(|row| PavementSegment {
            segment_name: non_empty(cell(row, "MSAG_Name")),
            from_street: non_empty(cell(row, "FromStreet")),
            to_street: non_empty(cell(row, "ToStreet")),
            pci: parse_f64(cell(row, "PCI")),
            latitude: parse_f64(cell(row, "Latitude")),
            longitude: parse_f64(cell(row, "Longitude")),
        })
        .collect())
}

/// Loads bus stops from the street inventory.
///
/// A missing `StopID` column is not an error; every stop then carries the
/// unknown identifier.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed.
pub fn load_bus_stops(reader: impl Read) -> Result<Vec<BusStop>, DatasetError> {
    let table = read_table("street inventory", reader)?;

    if !table.has_column("StopID") {
        log::warn!("street inventory has no StopID column; stops will be reported as Unknown");
    }

    Ok(table
        .rows
        .iter()
        .map(|row| {
            BusStop::new(
                non_empty(cell(row, "StopID")),
                parse_f64(cell(row, "Latitude")),
                parse_f64(cell(row, "Longitude")),
            )
        })
        .collect())
}

/// Loads weather rows verbatim.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed.
pub fn load_weather(reader: impl Read) -> Result<Vec<WeatherRecord>, DatasetError> {
    let table = read_table("weather", reader)?;
    Ok(table
        .rows
        .into_iter()
        .map(|fields| WeatherRecord { fields })
        .collect())
}
