//! Great-circle distance between coordinates

use crate::models::Coordinates;
use haversine::{Location as HaversineLocation, Units, distance};

/// Distance between two points in miles.
///
/// Symmetric and zero for identical points. Out-of-range coordinates are not
/// rejected here; callers validate upstream.
#[must_use]
pub fn distance_miles(from: &Coordinates, to: &Coordinates) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Miles)
}
