//! Randomized location offsetting.
//!
//! Produces a displayed location by displacing the true position a random
//! distance (up to the anonymity radius) in a random direction, so that the
//! true position can be anywhere within the rendered uncertainty circle.

use crate::geo_utils;
use crate::GeoPoint;
use rand::Rng;

/// Displace `actual` by a uniformly random distance in `[0, radius_meters)`
/// toward a uniformly random bearing.
///
/// The result lies within `radius_meters` of the input (up to flat-Earth
/// approximation error, acceptable for radii under ~10 km). Every call
/// resamples; calling twice with the same inputs yields different outputs
/// with overwhelming probability.
///
/// `radius_meters` must be positive.
///
/// # Example
///
/// ```rust
/// use safe_radius::{anonymize::anonymized_location, geo_utils, GeoPoint};
///
/// let actual = GeoPoint::new(43.706708, -72.293074);
/// let shown = anonymized_location(&actual, 100.0, &mut rand::thread_rng());
///
/// assert!(geo_utils::haversine_distance(&actual, &shown) <= 101.0);
/// ```
pub fn anonymized_location<R: Rng>(
    actual: &GeoPoint,
    radius_meters: f64,
    rng: &mut R,
) -> GeoPoint {
    let distance = rng.gen_range(0.0..radius_meters);
    let bearing = rng.gen_range(0.0..360.0);

    geo_utils::offset_by(actual, distance, bearing)
}
