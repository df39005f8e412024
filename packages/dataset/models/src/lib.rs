#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed rows for the civic pothole datasets.
//!
//! The four tables (311 complaints, pavement condition, bus stop / street
//! inventory, weather) are loaded once at startup and wrapped in an
//! immutable [`Datasets`] store. Derived complaint columns
//! (`fix_duration_days`, `year`) are computed on demand from the row's
//! timestamps rather than stored, so nothing about a query ever writes
//! back into the shared tables.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Seconds in one day, used to floor durations to whole days.
const SECONDS_PER_DAY: i64 = 86_400;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl LatLng {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate pair from nullable columns.
    ///
    /// Returns `None` if either side is missing or not a finite number.
    #[must_use]
    pub fn from_nullable(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        let latitude = latitude.filter(|v| v.is_finite())?;
        let longitude = longitude.filter(|v| v.is_finite())?;
        Some(Self::new(latitude, longitude))
    }
}

/// A single 311 pothole complaint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    /// Street the complaint was filed against.
    pub street_name: Option<String>,
    /// Council district label, when the source carries one.
    pub council_district: Option<String>,
    /// Latitude (unparseable values are `None`).
    pub latitude: Option<f64>,
    /// Longitude (unparseable values are `None`).
    pub longitude: Option<f64>,
    /// When the complaint was opened.
    pub opened_at: Option<NaiveDateTime>,
    /// When the complaint was closed. `None` means still active.
    pub closed_at: Option<NaiveDateTime>,
}

impl ComplaintRecord {
    /// A complaint is active until a closure timestamp is recorded.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Whole days between opening and closing, floored.
    ///
    /// `None` if either timestamp is missing.
    #[must_use]
    pub fn fix_duration_days(&self) -> Option<i64> {
        let opened = self.opened_at?;
        let closed = self.closed_at?;
        Some((closed - opened).num_seconds().div_euclid(SECONDS_PER_DAY))
    }

    /// Calendar year the complaint was opened in.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.opened_at.map(|opened| opened.year())
    }

    /// Location of the complaint, if both coordinates are present.
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        LatLng::from_nullable(self.latitude, self.longitude)
    }
}

/// The complaints table plus the column metadata intents branch on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintTable {
    /// All complaint rows in source order.
    pub records: Vec<ComplaintRecord>,
    /// Whether the source file had a council district column at all.
    pub has_council_district: bool,
}

impl ComplaintTable {
    /// Creates a table from rows.
    #[must_use]
    pub const fn new(records: Vec<ComplaintRecord>, has_council_district: bool) -> Self {
        Self {
            records,
            has_council_district,
        }
    }

    /// Number of complaint rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A pavement segment with its condition score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PavementSegment {
    /// Street name of the segment (MSAG name).
    pub segment_name: Option<String>,
    /// Cross street where the segment starts.
    pub from_street: Option<String>,
    /// Cross street where the segment ends.
    pub to_street: Option<String>,
    /// Pavement condition index. Lower is worse.
    pub pci: Option<f64>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
}

impl PavementSegment {
    /// Location of the segment, if both coordinates are present.
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        LatLng::from_nullable(self.latitude, self.longitude)
    }
}

/// Identifier used for bus stops whose source row has no stop ID.
pub const UNKNOWN_STOP_ID: &str = "Unknown";

/// A bus stop from the street inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStop {
    /// Stop identifier, [`UNKNOWN_STOP_ID`] when absent.
    pub stop_id: String,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
}

impl BusStop {
    /// Creates a bus stop, substituting [`UNKNOWN_STOP_ID`] for a missing
    /// or blank identifier.
    #[must_use]
    pub fn new(stop_id: Option<String>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        let stop_id = stop_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| UNKNOWN_STOP_ID.to_string());

        Self {
            stop_id,
            latitude,
            longitude,
        }
    }

    /// Location of the stop, if both coordinates are present.
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        LatLng::from_nullable(self.latitude, self.longitude)
    }
}

/// A raw weather row. No intent reads these yet, so the columns are kept
/// as strings keyed by header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Column header -> raw cell value.
    pub fields: BTreeMap<String, String>,
}

/// The immutable set of tables every query reads from.
///
/// Built once at startup and shared behind an `Arc`; nothing downstream
/// holds a mutable reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasets {
    /// 311 pothole complaints.
    pub complaints: ComplaintTable,
    /// Pavement condition segments.
    pub pavement: Vec<PavementSegment>,
    /// Bus stops from the street inventory.
    pub bus_stops: Vec<BusStop>,
    /// Weather observations.
    pub weather: Vec<WeatherRecord>,
}

impl Datasets {
    /// Bundles the four tables.
    #[must_use]
    pub const fn new(
        complaints: ComplaintTable,
        pavement: Vec<PavementSegment>,
        bus_stops: Vec<BusStop>,
        weather: Vec<WeatherRecord>,
    ) -> Self {
        Self {
            complaints,
            pavement,
            bus_stops,
            weather,
        }
    }
}
