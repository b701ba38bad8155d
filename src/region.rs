//! Uncertainty region construction.
//!
//! Builds the closed ring rendered around the displayed location. Vertex
//! placement delegates to `geo`'s haversine destination, so the ring is a
//! true geodesic circle rather than a flat-Earth one.

use crate::geo_utils;
use crate::GeoPoint;
use geo::{Destination, Haversine, Point};
use serde_json::{json, Value};

/// Ring vertices before closing. 64 matches the default step count of the
/// usual circle-polygon generators.
pub const RING_VERTICES: usize = 64;

/// A closed ring approximating a circle of `radius_meters` around `center`.
///
/// The ring is closed: its last vertex repeats the first, ready for use as
/// a GeoJSON Polygon ring.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertaintyRegion {
    center: GeoPoint,
    radius_meters: f64,
    ring: Vec<GeoPoint>,
}

impl UncertaintyRegion {
    /// Build the region around `center` with the given radius.
    ///
    /// Cheap and synchronous; callers rebuild it on every center or radius
    /// change rather than mutating in place.
    ///
    /// # Example
    ///
    /// ```rust
    /// use safe_radius::{region::UncertaintyRegion, GeoPoint};
    ///
    /// let center = GeoPoint::new(43.705013, -72.288718);
    /// let region = UncertaintyRegion::around(center, 100.0);
    ///
    /// assert_eq!(region.ring().first(), region.ring().last());
    /// assert!(region.contains(&center));
    /// ```
    pub fn around(center: GeoPoint, radius_meters: f64) -> Self {
        let origin = Point::new(center.longitude, center.latitude);

        let mut ring: Vec<GeoPoint> = (0..RING_VERTICES)
            .map(|i| {
                let bearing = (i as f64) * 360.0 / RING_VERTICES as f64;
                let vertex = Haversine::destination(origin, bearing, radius_meters);
                GeoPoint::new(vertex.y(), vertex.x())
            })
            .collect();

        // Close the ring
        ring.push(ring[0]);

        Self {
            center,
            radius_meters,
            ring,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// The closed ring, `RING_VERTICES + 1` points with first == last.
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Whether `point` lies inside the region (great-circle distance from
    /// the center within the radius).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        geo_utils::haversine_distance(&self.center, point) <= self.radius_meters
    }

    /// GeoJSON Polygon feature for the map's fill/outline source.
    pub fn to_polygon_feature(&self) -> Value {
        let coordinates: Vec<[f64; 2]> = self
            .ring
            .iter()
            .map(|p| [p.longitude, p.latitude])
            .collect();

        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [coordinates],
            },
            "properties": {},
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: GeoPoint = GeoPoint {
        latitude: 43.705013,
        longitude: -72.288718,
    };

    #[test]
    fn test_ring_is_closed() {
        let region = UncertaintyRegion::around(CENTER, 100.0);
        assert_eq!(region.ring().len(), RING_VERTICES + 1);
        assert_eq!(region.ring().first(), region.ring().last());
    }

    #[test]
    fn test_vertices_lie_on_the_circle() {
        for radius in [10.0, 100.0, 5000.0] {
            let region = UncertaintyRegion::around(CENTER, radius);
            for vertex in region.ring() {
                let dist = geo_utils::haversine_distance(&CENTER, vertex);
                assert!(
                    (dist - radius).abs() <= radius * 0.01 + 0.5,
                    "vertex at {}m for radius {}m",
                    dist,
                    radius
                );
            }
        }
    }

    #[test]
    fn test_contains_center_and_nearby() {
        let region = UncertaintyRegion::around(CENTER, 100.0);
        assert!(region.contains(&CENTER));

        let nearby = geo_utils::offset_by(&CENTER, 50.0, 123.0);
        assert!(region.contains(&nearby));

        let outside = geo_utils::offset_by(&CENTER, 250.0, 123.0);
        assert!(!region.contains(&outside));
    }

    #[test]
    fn test_polygon_feature_shape() {
        let region = UncertaintyRegion::around(CENTER, 100.0);
        let feature = region.to_polygon_feature();

        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"]["type"], "Polygon");

        let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), RING_VERTICES + 1);
        assert_eq!(ring.first(), ring.last());

        // GeoJSON positions are [lng, lat]
        let first = ring[0].as_array().unwrap();
        assert!((first[0].as_f64().unwrap() - CENTER.longitude).abs() < 0.01);
        assert!((first[1].as_f64().unwrap() - CENTER.latitude).abs() < 0.01);
    }
}
