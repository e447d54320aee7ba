use crate::geo::{GeoPoint, NEARBY_THRESHOLD_METERS};
use crate::model::Location;

/// One candidate in a proximity ranking: a location, its distance from the
/// device, and whether it falls within the unlock threshold.
#[derive(Debug, Clone, Copy)]
pub struct ProximityEntry<'a> {
    pub location: &'a Location,
    pub distance_meters: f64,
    pub nearby: bool,
}

/// Ranks candidate locations by distance from the device position.
///
/// Candidates with malformed position strings are skipped rather than failing
/// the batch. The result is sorted ascending by distance; equal distances keep
/// their input order. Pure over its inputs: the caller decides whether a
/// nearby entry triggers an unlock.
#[must_use]
pub fn rank<'a>(origin: GeoPoint, candidates: &'a [Location]) -> Vec<ProximityEntry<'a>> {
    let mut entries: Vec<ProximityEntry<'a>> = candidates
        .iter()
        .filter_map(|location| {
            let point = location.position().ok()?;
            let distance_meters = origin.distance_meters(&point);
            Some(ProximityEntry {
                location,
                distance_meters,
                nearby: distance_meters <= NEARBY_THRESHOLD_METERS,
            })
        })
        .collect();

    // Stable sort preserves input order for ties.
    entries.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    entries
}
