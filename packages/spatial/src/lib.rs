#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geodesic distance helpers and the fixed points of interest the
//! proximity intents measure against.
//!
//! Distances are ellipsoidal (WGS84, Karney's algorithm via
//! [`geo::Geodesic`]) rather than spherical, since the radius thresholds
//! the intents compare against are only a few hundred meters.
//!
//! No spatial index: proximity queries scan both filtered sets pairwise.

use geo::{Distance as _, Geodesic, Point};
use pothole_assistant_dataset_models::LatLng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Meters per kilometer.
const METERS_PER_KM: f64 = 1000.0;

/// Slack added to inclusive radius checks. Geodesic round-off puts a point
/// placed exactly on a radius up to a few nanometers either side of it.
pub const BOUNDARY_TOLERANCE_M: f64 = 1e-6;

/// The University of Texas at San Antonio main campus.
pub const UTSA: LatLng = LatLng::new(29.5843, -98.6190);

/// Geodesic distance between two points in meters.
///
/// Callers must only pass coordinates that came through
/// [`LatLng::from_nullable`] (or an equivalent finite check).
#[must_use]
pub fn distance_m(a: LatLng, b: LatLng) -> f64 {
    Geodesic.distance(to_point(a), to_point(b))
}

/// Geodesic distance between two points in kilometers.
#[must_use]
pub fn distance_km(a: LatLng, b: LatLng) -> f64 {
    distance_m(a, b) / METERS_PER_KM
}

/// Whether `b` lies within `radius_m` meters of `a`. The boundary is
/// inclusive, up to [`BOUNDARY_TOLERANCE_M`].
#[must_use]
pub fn within_m(a: LatLng, b: LatLng, radius_m: f64) -> bool {
    distance_m(a, b) <= radius_m + BOUNDARY_TOLERANCE_M
}

/// Whether `b` lies within `radius_km` kilometers of `a`. Same boundary
/// rule as [`within_m`].
#[must_use]
pub fn within_km(a: LatLng, b: LatLng, radius_km: f64) -> bool {
    within_m(a, b, radius_km * METERS_PER_KM)
}

/// `geo` points are `(x, y)`, i.e. `(longitude, latitude)`.
fn to_point(p: LatLng) -> Point<f64> {
    Point::new(p.longitude, p.latitude)
}

/// Kinds of sensitive locations the zone-proximity intent reports on.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZoneKind {
    /// A school.
    School,
    /// A hospital.
    Hospital,
    /// A senior center.
    SeniorCenter,
}

impl ZoneKind {
    /// Title-cased label for user-facing text ("Senior Center").
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::School => "School",
            Self::Hospital => "Hospital",
            Self::SeniorCenter => "Senior Center",
        }
    }
}

/// A named point of interest with a fixed location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantZone {
    /// What kind of place this is.
    pub kind: ZoneKind,
    /// Where it is.
    pub location: LatLng,
}

/// The configured zones, in reporting order.
pub const IMPORTANT_ZONES: &[ImportantZone] = &[
    ImportantZone {
        kind: ZoneKind::School,
        location: LatLng::new(29.5614, -98.6265),
    },
    ImportantZone {
        kind: ZoneKind::Hospital,
        location: LatLng::new(29.5085, -98.5756),
    },
    ImportantZone {
        kind: ZoneKind::SeniorCenter,
        location: LatLng::new(29.4931, -98.5412),
    },
];

#[cfg(test)]
mod tests {
    use geo::Destination as _;

    use super::*;

    /// Point `meters` due north of `origin`.
    fn north_of(origin: LatLng, meters: f64) -> LatLng {
        let p = Geodesic.destination(to_point(origin), 0.0, meters);
        LatLng::new(p.y(), p.x())
    }

    #[test]
    fn same_point_is_zero() {
        assert!(distance_m(UTSA, UTSA).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = IMPORTANT_ZONES[0].location;
        let b = IMPORTANT_ZONES[2].location;
        assert!((distance_m(a, b) - distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn km_is_meters_over_thousand() {
        let a = IMPORTANT_ZONES[1].location;
        assert!((distance_km(UTSA, a) * 1000.0 - distance_m(UTSA, a)).abs() < 1e-6);
    }

    #[test]
    fn matches_known_geodesic_distance() {
        // One degree of latitude at the equator on WGS84.
        let d = distance_m(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
        assert!((d - 110_574.389).abs() < 0.5, "got {d}");
    }

    #[test]
    fn destination_round_trips_through_distance() {
        let p = north_of(UTSA, 200.0);
        assert!((distance_m(UTSA, p) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn radius_checks_are_inclusive_of_near_boundary() {
        assert!(within_m(UTSA, north_of(UTSA, 199.9), 200.0));
        assert!(!within_m(UTSA, north_of(UTSA, 200.1), 200.0));
        assert!(within_km(UTSA, north_of(UTSA, 999.0), 1.0));
        assert!(!within_km(UTSA, north_of(UTSA, 1001.0), 1.0));
    }

    #[test]
    fn points_exactly_on_the_radius_are_inside() {
        let origins = std::iter::once(UTSA).chain(IMPORTANT_ZONES.iter().map(|z| z.location));
        for origin in origins {
            for bearing in [0.0, 45.0, 90.0, 135.0, 180.0, 270.0] {
                for meters in [200.0, 500.0, 1000.0] {
                    let p = Geodesic.destination(to_point(origin), bearing, meters);
                    let p = LatLng::new(p.y(), p.x());
                    assert!(
                        within_m(origin, p, meters),
                        "{meters} m at {bearing} deg from {origin:?}"
                    );
                    assert!(
                        within_km(origin, p, meters / 1000.0),
                        "{meters} m at {bearing} deg from {origin:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn zone_labels() {
        let labels: Vec<&str> = IMPORTANT_ZONES
            .iter()
            .map(|z| z.kind.display_label())
            .collect();
        assert_eq!(labels, vec!["School", "Hospital", "Senior Center"]);
        assert_eq!(ZoneKind::SeniorCenter.to_string(), "senior_center");
    }
}
