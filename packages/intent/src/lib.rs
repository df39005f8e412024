#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Keyword intent matching and the answer computations behind each intent.
//!
//! [`matcher::match_intent`] picks at most one [`Intent`] for a normalized
//! query; [`run`] dispatches it to the matching function in [`handlers`].
//! Handlers are synchronous and pure over the shared [`Datasets`].

pub mod format;
pub mod handlers;
pub mod matcher;

use pothole_assistant_dataset_models::Datasets;
use pothole_assistant_intent_models::{Intent, IntentOutcome};
use thiserror::Error;

/// A handler hit data it could not compute over.
///
/// Expected empty or ambiguous results are [`IntentOutcome`] values, not
/// errors.
#[derive(Debug, Error)]
pub enum IntentError {
    /// A denominator came out as zero.
    #[error("Division by zero: {what}")]
    DivisionByZero {
        /// What the denominator was.
        what: String,
    },

    /// A value could not be used as-is.
    #[error("Invalid value: {what}")]
    InvalidValue {
        /// Description of the offending value.
        what: String,
    },
}

/// Runs the handler for `intent`.
///
/// # Errors
///
/// Returns [`IntentError`] if the handler's computation fails.
pub fn run(
    intent: Intent,
    data: &Datasets,
    normalized_query: &str,
) -> Result<IntentOutcome, IntentError> {
    log::debug!("Running {intent} handler");

    match intent {
        Intent::ZoneProximity => Ok(handlers::zone_proximity(data)),
        Intent::TopStreets => Ok(handlers::top_streets(data)),
        Intent::StreetHistory => Ok(handlers::street_history(data, normalized_query)),
        Intent::BusStopRisk => Ok(handlers::bus_stop_risk(data)),
        Intent::PreventivePatch => handlers::preventive_patch(data),
        Intent::WorstPci => handlers::worst_pci(data),
        Intent::Trend => handlers::trend(data),
        Intent::AvgRepairTime => Ok(handlers::avg_repair_time(data)),
        Intent::TotalCount => Ok(handlers::total_count(data)),
        Intent::TopDistrict => Ok(handlers::top_district(data)),
        Intent::UtsaProximity => Ok(handlers::utsa_proximity(data)),
    }
}
