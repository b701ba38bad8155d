//! Static heatmap dataset generation.
//!
//! Builds the demonstration density layer: a corridor of weighted points
//! interpolated between two fixed endpoints, with a hotter middle band and a
//! few standalone hotspots. Generated once at startup and never recomputed.

use crate::geo_utils;
use crate::GeoPoint;
use serde_json::{json, Value};

/// A single weighted point in the heatmap layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatFeature {
    pub position: GeoPoint,
    /// Scalar weight the renderer's weight ramp keys on.
    pub heat: u32,
}

/// Seed describing how the corridor dataset is generated.
#[derive(Debug, Clone)]
pub struct CorridorSeed {
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Interpolation steps between the endpoints (inclusive of both, so
    /// `steps + 1` corridor points).
    pub steps: usize,
    /// Interpolation fraction band assigned `hot_heat`, inclusive.
    pub hot_band: (f64, f64),
    pub hot_heat: u32,
    pub base_heat: u32,
    /// Standalone hotspots appended after the corridor, always `hot_heat`.
    pub extras: Vec<GeoPoint>,
}

impl Default for CorridorSeed {
    /// The built-in demonstration corridor: 100 steps along a street
    /// segment, hot between 30% and 60%, plus three standalone hotspots.
    fn default() -> Self {
        Self {
            start: GeoPoint::new(43.706708, -72.293074),
            end: GeoPoint::new(43.706242, -72.291116),
            steps: 100,
            hot_band: (0.3, 0.6),
            hot_heat: 100,
            base_heat: 50,
            extras: vec![
                GeoPoint::new(43.702812, -72.291661),
                GeoPoint::new(43.702772, -72.290506),
                GeoPoint::new(43.703585, -72.284328),
            ],
        }
    }
}

/// The immutable weighted point set rendered as the heatmap layer.
#[derive(Debug, Clone)]
pub struct HeatmapDataset {
    features: Vec<HeatFeature>,
}

impl HeatmapDataset {
    /// Generate the dataset from a seed.
    ///
    /// With the default seed this yields 104 features: 101 corridor points
    /// and 3 extras.
    pub fn generate(seed: &CorridorSeed) -> Self {
        let mut features = Vec::with_capacity(seed.steps + 1 + seed.extras.len());

        for i in 0..=seed.steps {
            let t = i as f64 / seed.steps as f64;
            let position = geo_utils::lerp(&seed.start, &seed.end, t);
            let heat = if t >= seed.hot_band.0 && t <= seed.hot_band.1 {
                seed.hot_heat
            } else {
                seed.base_heat
            };
            features.push(HeatFeature { position, heat });
        }

        for extra in &seed.extras {
            features.push(HeatFeature {
                position: *extra,
                heat: seed.hot_heat,
            });
        }

        Self { features }
    }

    pub fn features(&self) -> &[HeatFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// GeoJSON FeatureCollection for the map's heatmap source, each feature
    /// carrying its `heat` property.
    pub fn to_feature_collection(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [f.position.longitude, f.position.latitude],
                    },
                    "properties": { "heat": f.heat },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
