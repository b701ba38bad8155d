//! # Geographic Utilities
//!
//! Core geographic computation utilities shared by the anonymization and
//! region-building code.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two points |
//! | [`offset_by`] | Displace a point by (distance, bearing) using a flat-Earth approximation |
//! | [`lerp`] | Linear interpolation between two points |
//!
//! ## Algorithm Notes
//!
//! ### Flat-Earth displacement
//!
//! [`offset_by`] converts a polar (distance, bearing) displacement into a
//! latitude/longitude delta using the small-angle approximation: one degree
//! of latitude is taken as 111 000 meters, and longitude degrees are scaled
//! by `1/cos(latitude)` for meridian convergence. The error is negligible at
//! the radii this crate works with (≤ 5 km); for anything larger, use a
//! proper geodesic routine such as `geo`'s haversine destination.
//!
//! ### Coordinate System
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees),
//! the standard used by GPS receivers and mapping services.

use crate::GeoPoint;
use geo::{Distance, Haversine, Point};

/// Meters per degree of latitude in the flat-Earth approximation.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Calculate the great-circle distance between two points using the
/// Haversine formula.
///
/// Returns the distance in meters along the Earth's surface (assuming a
/// spherical Earth with radius 6,371 km).
///
/// # Example
///
/// ```rust
/// use safe_radius::{GeoPoint, geo_utils};
///
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let paris = GeoPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Displace a point by `distance_meters` toward `bearing_degrees`
/// (clockwise from north) using the flat-Earth approximation.
///
/// # Example
///
/// ```rust
/// use safe_radius::{GeoPoint, geo_utils};
///
/// let origin = GeoPoint::new(43.7050, -72.2887);
/// let moved = geo_utils::offset_by(&origin, 100.0, 0.0); // 100m due north
///
/// assert!(moved.latitude > origin.latitude);
/// let dist = geo_utils::haversine_distance(&origin, &moved);
/// assert!((dist - 100.0).abs() < 2.0);
/// ```
pub fn offset_by(origin: &GeoPoint, distance_meters: f64, bearing_degrees: f64) -> GeoPoint {
    let bearing = bearing_degrees.to_radians();
    let lat_delta = (distance_meters * bearing.cos()) / METERS_PER_DEGREE_LAT;
    let lng_delta = (distance_meters * bearing.sin())
        / (METERS_PER_DEGREE_LAT * origin.latitude.to_radians().cos());

    GeoPoint::new(origin.latitude + lat_delta, origin.longitude + lng_delta)
}

/// Linear interpolation between two points.
///
/// `t = 0.0` returns `start`, `t = 1.0` returns `end`. Values outside
/// `[0, 1]` extrapolate. Adequate for the short segments this crate
/// interpolates; not antimeridian-aware.
#[inline]
pub fn lerp(start: &GeoPoint, end: &GeoPoint, t: f64) -> GeoPoint {
    GeoPoint::new(
        start.latitude + (end.latitude - start.latitude) * t,
        start.longitude + (end.longitude - start.longitude) * t,
    )
}
