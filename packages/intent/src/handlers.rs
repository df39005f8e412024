//! One computation per intent.
//!
//! Every handler reads the shared [`Datasets`] by reference and keeps its
//! intermediate values (filtered rows, distances, counts) in locals, so a
//! call never leaves anything behind on the tables.
//!
//! Proximity handlers are nested scans over two filtered sets.

use std::collections::{BTreeMap, BTreeSet};

use pothole_assistant_dataset_models::{Datasets, LatLng, PavementSegment};
use pothole_assistant_intent_models::{
    BAD_PCI_THRESHOLD, BUS_STOP_RADIUS_M, IntentOutcome, PATCH_SUGGESTION_LIMIT,
    REPEAT_COMPLAINT_THRESHOLD, TOP_STREETS_LIMIT, UTSA_RADIUS_KM, WORST_PCI_LIMIT,
    ZONE_RADIUS_KM,
};
use pothole_assistant_spatial::{IMPORTANT_ZONES, UTSA, within_km, within_m};

use crate::IntentError;
use crate::format::{pci_label, round1, thousands};

/// Question sent to the fallback model to explain the average repair time.
pub const REPAIR_TIME_EXPLANATION_QUESTION: &str = "Why might pothole repair take this long?";

/// Returns the segment's PCI if it is below [`BAD_PCI_THRESHOLD`].
fn bad_pci(segment: &PavementSegment) -> Option<f64> {
    segment.pci.filter(|pci| *pci < BAD_PCI_THRESHOLD)
}

/// Complaint counts per street name.
fn street_counts(data: &Datasets) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in &data.complaints.records {
        if let Some(street) = record.street_name.as_deref() {
            *counts.entry(street).or_insert(0) += 1;
        }
    }
    counts
}

/// Active complaints near each important zone.
#[must_use]
pub fn zone_proximity(data: &Datasets) -> IntentOutcome {
    let active: Vec<LatLng> = data
        .complaints
        .records
        .iter()
        .filter(|r| r.is_active())
        .filter_map(|r| r.location())
        .collect();

    log::debug!("zone-proximity: {} active complaints with coordinates", active.len());

    let lines: Vec<String> = IMPORTANT_ZONES
        .iter()
        .map(|zone| {
            let nearby = active
                .iter()
                .filter(|loc| within_km(zone.location, **loc, ZONE_RADIUS_KM))
                .count();
            format!(
                "{}: {nearby} active pothole complaints within 500 meters",
                zone.kind.display_label()
            )
        })
        .collect();

    IntentOutcome::Answer(lines.join("\n"))
}

/// The streets with the most complaints.
///
/// Ties are broken alphabetically so repeated calls rank identically.
#[must_use]
pub fn top_streets(data: &Datasets) -> IntentOutcome {
    let mut ranked: Vec<(&str, usize)> = street_counts(data).into_iter().collect();

    if ranked.is_empty() {
        return IntentOutcome::NoData(
            "No street names are recorded in the complaint data.".to_string(),
        );
    }

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_STREETS_LIMIT);

    let lines: Vec<String> = ranked
        .iter()
        .enumerate()
        .map(|(i, (street, count))| format!("{}. {street} — {count} complaints", i + 1))
        .collect();

    IntentOutcome::Answer(format!(
        "Top {} Most Frequently Reported Streets:\n\n{}",
        lines.len(),
        lines.join("\n")
    ))
}

/// Complaint history for the first known street named in the question.
///
/// Streets are tried in the order they first appear in the complaints
/// table.
#[must_use]
pub fn street_history(data: &Datasets, normalized_query: &str) -> IntentOutcome {
    let mut seen = BTreeSet::new();

    for street in data
        .complaints
        .records
        .iter()
        .filter_map(|r| r.street_name.as_deref())
    {
        let lowered = street.to_lowercase();
        if !seen.insert(lowered.clone()) || !normalized_query.contains(&lowered) {
            continue;
        }

        let count = data
            .complaints
            .records
            .iter()
            .filter_map(|r| r.street_name.as_deref())
            .filter(|name| name.to_lowercase() == lowered)
            .count();

        log::debug!("street-history: '{street}' has {count} complaints");

        let text = if count > REPEAT_COMPLAINT_THRESHOLD {
            format!("Yes — {count} complaints found on {street}. This is a frequent issue.")
        } else {
            format!("There are {count} complaints on {street}.")
        };
        return IntentOutcome::Answer(text);
    }

    IntentOutcome::Clarify(
        "Can you clarify which road you're asking about?".to_string(),
    )
}

/// Bus stops within [`BUS_STOP_RADIUS_M`] of any bad-PCI segment.
///
/// Counts distinct stop identifiers, so stops sharing an ID (including the
/// unknown placeholder) count once.
#[must_use]
pub fn bus_stop_risk(data: &Datasets) -> IntentOutcome {
    let bad_roads: Vec<LatLng> = data
        .pavement
        .iter()
        .filter(|s| bad_pci(s).is_some())
        .filter_map(PavementSegment::location)
        .collect();

    let mut at_risk = BTreeSet::new();

    for stop in &data.bus_stops {
        let Some(stop_loc) = stop.location() else {
            continue;
        };
        if bad_roads
            .iter()
            .any(|road| within_m(stop_loc, *road, BUS_STOP_RADIUS_M))
        {
            at_risk.insert(stop.stop_id.as_str());
        }
    }

    log::debug!(
        "bus-stop-risk: {} bad segments, {} at-risk stops",
        bad_roads.len(),
        at_risk.len()
    );

    if at_risk.is_empty() {
        return IntentOutcome::Answer(
            "No bus stops found near poor PCI roads.".to_string(),
        );
    }

    IntentOutcome::Answer(format!(
        "{} bus stops are near roads with poor PCI scores.",
        at_risk.len()
    ))
}

/// Bad-PCI segments on streets with repeat complaints.
///
/// # Errors
///
/// Returns [`IntentError::InvalidValue`] if a matching segment's PCI is not
/// finite.
pub fn preventive_patch(data: &Datasets) -> Result<IntentOutcome, IntentError> {
    let repeated: BTreeSet<&str> = street_counts(data)
        .into_iter()
        .filter(|(_, count)| *count > REPEAT_COMPLAINT_THRESHOLD)
        .map(|(street, _)| street)
        .collect();

    let mut suggestions = Vec::new();

    for segment in &data.pavement {
        if suggestions.len() == PATCH_SUGGESTION_LIMIT {
            break;
        }
        let (Some(pci), Some(name)) = (bad_pci(segment), segment.segment_name.as_deref()) else {
            continue;
        };
        if repeated.contains(name) {
            suggestions.push(format!("{name} (PCI: {})", pci_label(pci)?));
        }
    }

    if suggestions.is_empty() {
        return Ok(IntentOutcome::Answer("No matching streets found.".to_string()));
    }

    Ok(IntentOutcome::Answer(format!(
        "Suggested streets for preventive patching:\n\n{}",
        suggestions.join("\n")
    )))
}

/// The lowest-PCI segments below the bad threshold.
///
/// Segments missing a name, either cross street, or a score are skipped.
///
/// # Errors
///
/// Returns [`IntentError::InvalidValue`] if a listed PCI is not finite.
pub fn worst_pci(data: &Datasets) -> Result<IntentOutcome, IntentError> {
    let mut poor: Vec<(&str, &str, &str, f64)> = data
        .pavement
        .iter()
        .filter_map(|s| {
            Some((
                s.segment_name.as_deref()?,
                s.from_street.as_deref()?,
                s.to_street.as_deref()?,
                bad_pci(s)?,
            ))
        })
        .collect();

    if poor.is_empty() {
        return Ok(IntentOutcome::NoData(format!(
            "No road segments with a PCI below {BAD_PCI_THRESHOLD} were found."
        )));
    }

    poor.sort_by(|a, b| a.3.total_cmp(&b.3));
    poor.truncate(WORST_PCI_LIMIT);

    let lines = poor
        .iter()
        .map(|(name, from, to, pci)| {
            Ok(format!("{name} from {from} to {to} (PCI: {})", pci_label(*pci)?))
        })
        .collect::<Result<Vec<_>, IntentError>>()?;

    Ok(IntentOutcome::Answer(format!(
        "Here are {} roads with the worst pavement conditions:\n\n{}",
        lines.len(),
        lines.join("\n")
    )))
}

/// Compares complaint counts for the two most recent years.
///
/// # Errors
///
/// Returns [`IntentError::DivisionByZero`] if the earlier year has no
/// complaints.
#[allow(clippy::cast_precision_loss)]
pub fn trend(data: &Datasets) -> Result<IntentOutcome, IntentError> {
    let mut yearly: BTreeMap<i32, usize> = BTreeMap::new();
    for year in data.complaints.records.iter().filter_map(|r| r.year()) {
        *yearly.entry(year).or_insert(0) += 1;
    }

    let mut recent = yearly.iter().rev();
    let (Some((&current_year, &current)), Some((&prev_year, &prev))) = (recent.next(), recent.next())
    else {
        return Ok(IntentOutcome::NoData(
            "There isn't enough yearly data to compare pothole complaints.".to_string(),
        ));
    };

    if prev == 0 {
        return Err(IntentError::DivisionByZero {
            what: format!("complaint count for {prev_year}"),
        });
    }

    let percent = round1((current as f64 - prev as f64) / prev as f64 * 100.0);

    let text = match current.cmp(&prev) {
        std::cmp::Ordering::Greater => format!(
            "Yes — pothole complaints increased by **{percent:.1}%** from {prev_year} to {current_year}."
        ),
        std::cmp::Ordering::Less => format!(
            "No — complaints decreased by **{:.1}%** from {prev_year} to {current_year}.",
            percent.abs()
        ),
        std::cmp::Ordering::Equal => format!(
            "No — complaints held steady at {} from {prev_year} to {current_year} (0.0% change).",
            thousands(current)
        ),
    };

    Ok(IntentOutcome::Answer(text))
}

/// Mean repair time in days, ignoring complaints without both timestamps.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn avg_repair_time(data: &Datasets) -> IntentOutcome {
    let durations: Vec<i64> = data
        .complaints
        .records
        .iter()
        .filter_map(|r| r.fix_duration_days())
        .collect();

    if durations.is_empty() {
        return IntentOutcome::NoData(
            "No closed complaints with both open and close dates are available to compute repair time."
                .to_string(),
        );
    }

    let total: i64 = durations.iter().sum();
    let avg = round1(total as f64 / durations.len() as f64);

    IntentOutcome::Answer(format!(
        "On average, potholes take about **{avg:.1} days** to get fixed in San Antonio."
    ))
}

/// Total complaint rows.
#[must_use]
pub fn total_count(data: &Datasets) -> IntentOutcome {
    IntentOutcome::Answer(format!(
        "There are approximately {} reported pothole complaints in the city.",
        thousands(data.complaints.len())
    ))
}

/// The council district with the most complaints.
///
/// Ties go to the lexically smallest district label.
#[must_use]
pub fn top_district(data: &Datasets) -> IntentOutcome {
    if !data.complaints.has_council_district {
        return IntentOutcome::DataUnavailable(
            "District data isn't available.".to_string(),
        );
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for district in data
        .complaints
        .records
        .iter()
        .filter_map(|r| r.council_district.as_deref())
    {
        *counts.entry(district).or_insert(0) += 1;
    }

    let top = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(district, _)| *district);

    let Some(district) = top else {
        return IntentOutcome::NoData(
            "No complaints have a council district recorded.".to_string(),
        );
    };

    IntentOutcome::Answer(format!(
        "Council District {district} has the highest number of reported potholes."
    ))
}

/// Complaints within [`UTSA_RADIUS_KM`] of UTSA.
#[must_use]
pub fn utsa_proximity(data: &Datasets) -> IntentOutcome {
    let nearby = data
        .complaints
        .records
        .iter()
        .filter_map(|r| r.location())
        .filter(|loc| within_km(UTSA, *loc, UTSA_RADIUS_KM))
        .count();

    IntentOutcome::Answer(format!(
        "There are {nearby} pothole complaints within 1 km of UTSA."
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use geo::{Destination as _, Geodesic, Point};
    use pothole_assistant_dataset_models::{BusStop, ComplaintRecord, ComplaintTable};

    use super::*;

    fn day(year: i32, month: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn on_street(street: &str) -> ComplaintRecord {
        ComplaintRecord {
            street_name: Some(street.to_string()),
            ..Default::default()
        }
    }

    fn active_at(loc: LatLng) -> ComplaintRecord {
        ComplaintRecord {
            latitude: Some(loc.latitude),
            longitude: Some(loc.longitude),
            opened_at: Some(day(2024, 1, 1)),
            ..Default::default()
        }
    }

    fn with_complaints(records: Vec<ComplaintRecord>) -> Datasets {
        Datasets {
            complaints: ComplaintTable::new(records, false),
            ..Default::default()
        }
    }

    fn segment(name: &str, pci: f64, loc: Option<LatLng>) -> PavementSegment {
        PavementSegment {
            segment_name: Some(name.to_string()),
            from_street: Some("1st St".to_string()),
            to_street: Some("2nd St".to_string()),
            pci: Some(pci),
            latitude: loc.map(|l| l.latitude),
            longitude: loc.map(|l| l.longitude),
        }
    }

    fn north_of(origin: LatLng, meters: f64) -> LatLng {
        let p = Geodesic.destination(Point::new(origin.longitude, origin.latitude), 0.0, meters);
        LatLng::new(p.y(), p.x())
    }

    #[test]
    fn zone_proximity_reports_one_line_per_zone() {
        let school = IMPORTANT_ZONES[0].location;
        let mut closed = active_at(school);
        closed.closed_at = Some(day(2024, 1, 3));
        let no_coords = ComplaintRecord::default();

        let data = with_complaints(vec![
            active_at(school),
            active_at(north_of(school, 450.0)),
            active_at(north_of(school, 600.0)),
            closed,
            no_coords,
        ]);

        let text = zone_proximity(&data).into_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "School: 2 active pothole complaints within 500 meters",
                "Hospital: 0 active pothole complaints within 500 meters",
                "Senior Center: 0 active pothole complaints within 500 meters",
            ]
        );
    }

    #[test]
    fn zone_proximity_counts_complaints_exactly_500m_away() {
        let data = with_complaints(
            IMPORTANT_ZONES
                .iter()
                .map(|z| active_at(north_of(z.location, 500.0)))
                .collect(),
        );
        let text = zone_proximity(&data).into_text();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "School: 1 active pothole complaints within 500 meters",
                "Hospital: 1 active pothole complaints within 500 meters",
                "Senior Center: 1 active pothole complaints within 500 meters",
            ]
        );
    }

    #[test]
    fn zone_proximity_with_no_complaints_still_lists_zones() {
        let text = zone_proximity(&Datasets::default()).into_text();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn top_streets_ranks_by_count_then_name() {
        let mut records = Vec::new();
        records.extend(std::iter::repeat_with(|| on_street("Oak Ave")).take(3));
        records.extend(std::iter::repeat_with(|| on_street("Main St")).take(5));
        records.extend(std::iter::repeat_with(|| on_street("Elm St")).take(3));
        records.push(ComplaintRecord::default());

        let text = top_streets(&with_complaints(records)).into_text();
        assert_eq!(
            text,
            "Top 3 Most Frequently Reported Streets:\n\n\
             1. Main St — 5 complaints\n\
             2. Elm St — 3 complaints\n\
             3. Oak Ave — 3 complaints"
        );
    }

    #[test]
    fn top_streets_caps_at_ten() {
        let records = (0..15).map(|i| on_street(&format!("Street {i:02}"))).collect();
        let text = top_streets(&with_complaints(records)).into_text();
        assert!(text.starts_with("Top 10 "));
        assert!(text.contains("10. Street 09 — 1 complaints"));
        assert!(!text.contains("11."));
    }

    #[test]
    fn top_streets_without_names_is_no_data() {
        let data = with_complaints(vec![ComplaintRecord::default()]);
        assert!(matches!(top_streets(&data), IntentOutcome::NoData(_)));
    }

    #[test]
    fn street_history_frequent_street() {
        let mut records: Vec<_> = std::iter::repeat_with(|| on_street("Main St")).take(6).collect();
        records.push(on_street("Oak Ave"));
        let data = with_complaints(records);

        let outcome = street_history(&data, "has anyone complained about main st before");
        let text = outcome.into_text();
        assert!(text.starts_with("Yes — 6 complaints found on Main St."), "{text}");
        assert!(text.contains("frequent"));
    }

    #[test]
    fn street_history_infrequent_street() {
        let mut records: Vec<_> = std::iter::repeat_with(|| on_street("Oak Ave")).take(3).collect();
        records.push(on_street("Main St"));
        let data = with_complaints(records);

        let outcome = street_history(&data, "have people complained about oak ave");
        assert_eq!(
            outcome,
            IntentOutcome::Answer("There are 3 complaints on Oak Ave.".to_string())
        );
    }

    #[test]
    fn street_history_counts_case_insensitively() {
        let data = with_complaints(vec![on_street("MAIN ST"), on_street("Main St")]);
        let text = street_history(&data, "history of main st").into_text();
        assert_eq!(text, "There are 2 complaints on MAIN ST.");
    }

    #[test]
    fn street_history_asks_for_clarification() {
        let data = with_complaints(vec![on_street("Main St")]);
        assert!(matches!(
            street_history(&data, "any history on my road?"),
            IntentOutcome::Clarify(_)
        ));
    }

    fn bus_stop_data(stop: LatLng, road: LatLng, pci: f64) -> Datasets {
        Datasets {
            pavement: vec![segment("Main St", pci, Some(road))],
            bus_stops: vec![BusStop::new(
                Some("101".to_string()),
                Some(stop.latitude),
                Some(stop.longitude),
            )],
            ..Default::default()
        }
    }

    #[test]
    fn bus_stop_at_segment_is_at_risk() {
        let road = UTSA;
        let text = bus_stop_risk(&bus_stop_data(road, road, 35.0)).into_text();
        assert_eq!(text, "1 bus stops are near roads with poor PCI scores.");
    }

    #[test]
    fn bus_stop_radius_boundary() {
        let road = UTSA;
        let inside = bus_stop_data(north_of(road, 199.9), road, 35.0);
        let outside = bus_stop_data(north_of(road, 200.1), road, 35.0);

        assert_eq!(
            bus_stop_risk(&inside).into_text(),
            "1 bus stops are near roads with poor PCI scores."
        );
        assert_eq!(
            bus_stop_risk(&outside).into_text(),
            "No bus stops found near poor PCI roads."
        );
    }

    #[test]
    fn bus_stop_exactly_200m_away_is_at_risk() {
        let origins = std::iter::once(UTSA).chain(IMPORTANT_ZONES.iter().map(|z| z.location));
        for road in origins {
            let data = bus_stop_data(north_of(road, 200.0), road, 35.0);
            assert_eq!(
                bus_stop_risk(&data).into_text(),
                "1 bus stops are near roads with poor PCI scores.",
                "road at {road:?}"
            );
        }
    }

    #[test]
    fn bus_stop_ignores_good_roads_and_missing_coordinates() {
        let road = UTSA;
        let good = bus_stop_data(road, road, 40.0);
        assert_eq!(
            bus_stop_risk(&good).into_text(),
            "No bus stops found near poor PCI roads."
        );

        let mut no_coords = bus_stop_data(road, road, 20.0);
        no_coords.bus_stops[0].latitude = None;
        assert_eq!(
            bus_stop_risk(&no_coords).into_text(),
            "No bus stops found near poor PCI roads."
        );
    }

    #[test]
    fn bus_stop_counts_distinct_ids() {
        let road = UTSA;
        let data = Datasets {
            pavement: vec![
                segment("Main St", 10.0, Some(road)),
                segment("Main St", 12.0, Some(north_of(road, 50.0))),
            ],
            bus_stops: vec![
                BusStop::new(Some("7".to_string()), Some(road.latitude), Some(road.longitude)),
                BusStop::new(Some("7".to_string()), Some(road.latitude), Some(road.longitude)),
                BusStop::new(None, Some(road.latitude), Some(road.longitude)),
                BusStop::new(None, Some(road.latitude), Some(road.longitude)),
            ],
            ..Default::default()
        };
        assert_eq!(
            bus_stop_risk(&data).into_text(),
            "2 bus stops are near roads with poor PCI scores."
        );
    }

    #[test]
    fn preventive_patch_intersects_bad_roads_with_repeat_streets() {
        let mut records: Vec<_> = std::iter::repeat_with(|| on_street("Main St")).take(6).collect();
        records.extend(std::iter::repeat_with(|| on_street("Oak Ave")).take(5));
        let data = Datasets {
            complaints: ComplaintTable::new(records, false),
            pavement: vec![
                segment("Main St", 31.7, None),
                segment("Oak Ave", 20.0, None),
                segment("Main St", 55.0, None),
            ],
            ..Default::default()
        };

        let text = preventive_patch(&data).unwrap().into_text();
        assert_eq!(
            text,
            "Suggested streets for preventive patching:\n\nMain St (PCI: 31)"
        );
    }

    #[test]
    fn preventive_patch_limits_to_five() {
        let records = std::iter::repeat_with(|| on_street("Main St")).take(6).collect();
        let data = Datasets {
            complaints: ComplaintTable::new(records, false),
            pavement: (0..8).map(|i| segment("Main St", f64::from(i), None)).collect(),
            ..Default::default()
        };
        let text = preventive_patch(&data).unwrap().into_text();
        assert_eq!(text.lines().filter(|l| l.starts_with("Main St")).count(), 5);
    }

    #[test]
    fn preventive_patch_without_matches() {
        let data = Datasets {
            complaints: ComplaintTable::new(vec![on_street("Main St")], false),
            pavement: vec![segment("Main St", 10.0, None)],
            ..Default::default()
        };
        assert_eq!(
            preventive_patch(&data).unwrap().into_text(),
            "No matching streets found."
        );
    }

    #[test]
    fn worst_pci_sorts_ascending_and_skips_incomplete_rows() {
        let mut incomplete = segment("Pine St", 1.0, None);
        incomplete.to_street = None;

        let data = Datasets {
            pavement: vec![
                segment("Main St", 38.2, None),
                segment("Oak Ave", 12.9, None),
                segment("Elm St", 45.0, None),
                incomplete,
                segment("Ash Dr", 25.0, None),
            ],
            ..Default::default()
        };

        let text = worst_pci(&data).unwrap().into_text();
        assert_eq!(
            text,
            "Here are 3 roads with the worst pavement conditions:\n\n\
             Oak Ave from 1st St to 2nd St (PCI: 12)\n\
             Ash Dr from 1st St to 2nd St (PCI: 25)\n\
             Main St from 1st St to 2nd St (PCI: 38)"
        );
    }

    #[test]
    fn worst_pci_without_bad_roads_is_no_data() {
        let data = Datasets {
            pavement: vec![segment("Main St", 80.0, None)],
            ..Default::default()
        };
        assert!(matches!(worst_pci(&data).unwrap(), IntentOutcome::NoData(_)));
    }

    fn opened_in(year: i32, count: usize) -> impl Iterator<Item = ComplaintRecord> {
        std::iter::repeat_with(move || ComplaintRecord {
            opened_at: Some(day(year, 6, 1)),
            ..Default::default()
        })
        .take(count)
    }

    #[test]
    fn trend_reports_increase() {
        let records = opened_in(2022, 100).chain(opened_in(2023, 120)).collect();
        let text = trend(&with_complaints(records)).unwrap().into_text();
        assert_eq!(
            text,
            "Yes — pothole complaints increased by **20.0%** from 2022 to 2023."
        );
    }

    #[test]
    fn trend_compares_two_most_recent_years() {
        let records = opened_in(2020, 5)
            .chain(opened_in(2023, 80))
            .chain(opened_in(2021, 40))
            .collect();
        let text = trend(&with_complaints(records)).unwrap().into_text();
        assert_eq!(
            text,
            "Yes — pothole complaints increased by **100.0%** from 2021 to 2023."
        );
    }

    #[test]
    fn trend_reports_decrease_as_magnitude() {
        let records = opened_in(2022, 120).chain(opened_in(2023, 90)).collect();
        let text = trend(&with_complaints(records)).unwrap().into_text();
        assert_eq!(
            text,
            "No — complaints decreased by **25.0%** from 2022 to 2023."
        );
    }

    #[test]
    fn trend_reports_no_change() {
        let records = opened_in(2022, 50).chain(opened_in(2023, 50)).collect();
        let text = trend(&with_complaints(records)).unwrap().into_text();
        assert!(text.contains("held steady"), "{text}");
    }

    #[test]
    fn trend_needs_two_years() {
        let records = opened_in(2023, 10).collect();
        assert!(matches!(
            trend(&with_complaints(records)).unwrap(),
            IntentOutcome::NoData(_)
        ));
    }

    #[test]
    fn avg_repair_time_excludes_open_complaints() {
        let records = [2, 4, 6]
            .into_iter()
            .map(|days| ComplaintRecord {
                opened_at: Some(day(2024, 1, 1)),
                closed_at: Some(day(2024, 1, 1) + chrono::TimeDelta::days(days)),
                ..Default::default()
            })
            .chain(std::iter::once(ComplaintRecord {
                opened_at: Some(day(2024, 1, 1)),
                ..Default::default()
            }))
            .collect();

        let text = avg_repair_time(&with_complaints(records)).into_text();
        assert_eq!(
            text,
            "On average, potholes take about **4.0 days** to get fixed in San Antonio."
        );
    }

    #[test]
    fn avg_repair_time_without_durations_is_no_data() {
        let data = with_complaints(vec![ComplaintRecord::default()]);
        assert!(matches!(avg_repair_time(&data), IntentOutcome::NoData(_)));
    }

    #[test]
    fn total_count_is_thousands_separated() {
        let data = with_complaints(vec![ComplaintRecord::default(); 12_345]);
        assert_eq!(
            total_count(&data).into_text(),
            "There are approximately 12,345 reported pothole complaints in the city."
        );
    }

    #[test]
    fn top_district_without_column_is_unavailable() {
        let data = with_complaints(vec![ComplaintRecord::default()]);
        assert_eq!(
            top_district(&data),
            IntentOutcome::DataUnavailable("District data isn't available.".to_string())
        );
    }

    #[test]
    fn top_district_picks_mode() {
        let district = |d: &str| ComplaintRecord {
            council_district: Some(d.to_string()),
            ..Default::default()
        };
        let data = Datasets {
            complaints: ComplaintTable::new(
                vec![
                    district("3"),
                    district("7"),
                    district("7"),
                    district("2"),
                    district("2"),
                    ComplaintRecord::default(),
                ],
                true,
            ),
            ..Default::default()
        };
        assert_eq!(
            top_district(&data).into_text(),
            "Council District 2 has the highest number of reported potholes."
        );
    }

    #[test]
    fn top_district_with_only_nulls_is_no_data() {
        let data = Datasets {
            complaints: ComplaintTable::new(vec![ComplaintRecord::default()], true),
            ..Default::default()
        };
        assert!(matches!(top_district(&data), IntentOutcome::NoData(_)));
    }

    #[test]
    fn utsa_counts_open_and_closed_within_one_km() {
        let mut closed = active_at(north_of(UTSA, 900.0));
        closed.closed_at = Some(day(2024, 2, 1));
        let data = with_complaints(vec![
            active_at(UTSA),
            closed,
            active_at(north_of(UTSA, 1100.0)),
            ComplaintRecord::default(),
        ]);
        assert_eq!(
            utsa_proximity(&data).into_text(),
            "There are 2 pothole complaints within 1 km of UTSA."
        );
    }

    #[test]
    fn utsa_counts_complaint_exactly_1km_away() {
        let data = with_complaints(vec![active_at(north_of(UTSA, 1000.0))]);
        assert_eq!(
            utsa_proximity(&data).into_text(),
            "There are 1 pothole complaints within 1 km of UTSA."
        );
    }

    #[test]
    fn handlers_do_not_mutate_datasets() {
        let data = with_complaints(vec![active_at(UTSA), on_street("Main St")]);
        let before = data.clone();
        let _ = zone_proximity(&data);
        let _ = utsa_proximity(&data);
        let _ = top_streets(&data);
        assert_eq!(data, before);
    }
}
