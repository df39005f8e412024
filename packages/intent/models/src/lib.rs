#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Intent identifiers, their keyword triggers, and handler outcomes.
//!
//! [`INTENT_RULES`] is the single source of intent precedence: the matcher
//! walks it top to bottom and the first rule whose trigger fires wins.
//! Reordering that table is the only way to change which intent a query
//! with overlapping keywords resolves to.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// PCI strictly below this marks a road segment as bad.
pub const BAD_PCI_THRESHOLD: f64 = 40.0;

/// Radius around each important zone, in kilometers.
pub const ZONE_RADIUS_KM: f64 = 0.5;

/// Radius around a bus stop within which a bad segment puts it at risk.
pub const BUS_STOP_RADIUS_M: f64 = 200.0;

/// Radius around UTSA, in kilometers.
pub const UTSA_RADIUS_KM: f64 = 1.0;

/// A street with more complaints than this is a repeat-complaint street.
pub const REPEAT_COMPLAINT_THRESHOLD: usize = 5;

/// Number of streets in the top-streets ranking.
pub const TOP_STREETS_LIMIT: usize = 10;

/// Number of segments in the worst-PCI listing.
pub const WORST_PCI_LIMIT: usize = 5;

/// Number of streets suggested for preventive patching.
pub const PATCH_SUGGESTION_LIMIT: usize = 5;

/// A recognized category of question.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Intent {
    /// Active complaints near schools, hospitals, and senior centers.
    ZoneProximity,
    /// Streets ranked by complaint count.
    TopStreets,
    /// Complaint history for a street named in the question.
    StreetHistory,
    /// Bus stops near bad-PCI road segments.
    BusStopRisk,
    /// Bad-PCI streets that also draw repeat complaints.
    PreventivePatch,
    /// The worst-scored pavement segments.
    WorstPci,
    /// Year-over-year complaint change.
    Trend,
    /// Mean days from open to close.
    AvgRepairTime,
    /// Total complaint count.
    TotalCount,
    /// Council district with the most complaints.
    TopDistrict,
    /// Complaints near UTSA.
    UtsaProximity,
}

impl Intent {
    /// Short description used in user-facing apologies.
    #[must_use]
    pub const fn topic(self) -> &'static str {
        match self {
            Self::ZoneProximity => "potholes near schools, hospitals, and senior centers",
            Self::TopStreets => "the most reported streets",
            Self::StreetHistory => "that street's complaint history",
            Self::BusStopRisk => "bus stops near poor roads",
            Self::PreventivePatch => "preventive patching candidates",
            Self::WorstPci => "the worst pavement conditions",
            Self::Trend => "the complaint trend",
            Self::AvgRepairTime => "average repair time",
            Self::TotalCount => "the total number of complaints",
            Self::TopDistrict => "complaints by council district",
            Self::UtsaProximity => "potholes near UTSA",
        }
    }
}

/// Keyword condition that fires an intent.
///
/// Fires when the query contains every `all` keyword and, if `any` is
/// non-empty, at least one `any` keyword. Matching is plain substring
/// containment over the normalized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    /// Keywords that must all appear.
    pub all: &'static [&'static str],
    /// Keywords of which at least one must appear.
    pub any: &'static [&'static str],
}

impl Trigger {
    /// Fires when any keyword appears.
    #[must_use]
    pub const fn any_of(any: &'static [&'static str]) -> Self {
        Self { all: &[], any }
    }

    /// Fires when every `all` keyword and one `any` keyword appear.
    #[must_use]
    pub const fn all_and_any(all: &'static [&'static str], any: &'static [&'static str]) -> Self {
        Self { all, any }
    }

    /// Tests the trigger against an already-normalized query.
    #[must_use]
    pub fn fires(&self, normalized_query: &str) -> bool {
        if self.all.is_empty() && self.any.is_empty() {
            return false;
        }
        self.all.iter().all(|kw| normalized_query.contains(kw))
            && (self.any.is_empty() || self.any.iter().any(|kw| normalized_query.contains(kw)))
    }
}

/// One entry in the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    /// Intent dispatched when the trigger fires.
    pub intent: Intent,
    /// Keyword condition.
    pub trigger: Trigger,
}

/// Intent rules in priority order. First match wins.
///
/// Bus-stop risk sits above worst-PCI so that "bus stop" questions
/// mentioning poor condition are not swallowed by the generic
/// bad-roads rule.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::ZoneProximity,
        trigger: Trigger::any_of(&[
            "school",
            "hospital",
            "senior center",
            "active potholes near",
        ]),
    },
    IntentRule {
        intent: Intent::TopStreets,
        trigger: Trigger::any_of(&[
            "top complaint",
            "most pothole",
            "top 10",
            "frequent pothole",
            "most reported",
            "complaint streets",
        ]),
    },
    IntentRule {
        intent: Intent::StreetHistory,
        trigger: Trigger::any_of(&[
            "repeated complaints",
            "complained before",
            "history",
            "have people complained",
            "anyone complained",
        ]),
    },
    IntentRule {
        intent: Intent::BusStopRisk,
        trigger: Trigger::all_and_any(&["bus stop"], &["pci", "bad road", "poor condition"]),
    },
    IntentRule {
        intent: Intent::PreventivePatch,
        trigger: Trigger::any_of(&["preventive patch", "before rain", "prioritize patching"]),
    },
    IntentRule {
        intent: Intent::WorstPci,
        trigger: Trigger::any_of(&["worst pci", "bad roads", "poor condition"]),
    },
    IntentRule {
        intent: Intent::Trend,
        trigger: Trigger::any_of(&["increase", "trend", "more potholes", "complaints rising"]),
    },
    IntentRule {
        intent: Intent::AvgRepairTime,
        trigger: Trigger::any_of(&["how long", "repair time", "average fix"]),
    },
    IntentRule {
        intent: Intent::TotalCount,
        trigger: Trigger::any_of(&["how many potholes"]),
    },
    IntentRule {
        intent: Intent::TopDistrict,
        trigger: Trigger::any_of(&["most potholes", "highest amount"]),
    },
    IntentRule {
        intent: Intent::UtsaProximity,
        trigger: Trigger::any_of(&["utsa"]),
    },
];

/// What a handler produced.
///
/// Only [`IntentOutcome::Answer`] carries computed results; the other
/// variants are expected, non-error outcomes that still render to a
/// displayable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "camelCase")]
pub enum IntentOutcome {
    /// A computed answer.
    Answer(String),
    /// The filtered data was empty, so there was nothing to compute.
    NoData(String),
    /// The question needs a detail the engine could not find in it.
    Clarify(String),
    /// The dataset lacks the dimension the question asks about.
    DataUnavailable(String),
}

impl IntentOutcome {
    /// The displayable message.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Answer(text)
            | Self::NoData(text)
            | Self::Clarify(text)
            | Self::DataUnavailable(text) => text,
        }
    }

    /// Whether this carries a computed answer.
    #[must_use]
    pub const fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }
}
