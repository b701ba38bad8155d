//! # Safe Radius
//!
//! Privacy-preserving location display with anonymity radius visualization.
//!
//! This library provides:
//! - Randomized location offsetting within a configurable anonymity radius
//! - Uncertainty region construction (a closed ring the true location is in)
//! - A location state controller with explicit, synchronous transition handlers
//! - Declarative map layer descriptions (GeoJSON sources + paint ramps) and
//!   a static heatmap demonstration layer
//!
//! The true location never leaves the controller: the rendering surface only
//! ever sees the offset location and the uncertainty region around it.
//!
//! ## Quick Start
//!
//! ```rust
//! use safe_radius::{LocationController, FIXED_LOCATION};
//!
//! let mut controller = LocationController::new();
//!
//! // Opt out of live positioning: the fixed reference point is assigned
//! // immediately and all derived state is recomputed before this returns.
//! controller.set_use_fixed_location(true);
//!
//! let shown = controller.display_location().unwrap();
//! let region = controller.region().unwrap();
//! assert_eq!(region.center(), shown);
//!
//! // The displayed point stays within the anonymity radius of the true
//! // position (1% slack for the flat-Earth approximation).
//! let dist = safe_radius::geo_utils::haversine_distance(&FIXED_LOCATION, &shown);
//! assert!(dist <= controller.radius_meters() * 1.01);
//! ```

pub mod anonymize;
pub mod controller;
pub mod geo_utils;
pub mod heatmap;
pub mod map;
pub mod region;
pub mod session;

pub use anonymize::anonymized_location;
pub use controller::{ControllerState, LocationController, PositionRequest};
pub use heatmap::{CorridorSeed, HeatFeature, HeatmapDataset};
pub use map::{
    FixedLocationCheckbox, LayerPalette, MapStyle, MapView, PositionError, PositionSource,
    RadiusSlider, RenderFrame, Viewport,
};
pub use region::UncertaintyRegion;
pub use session::MapSession;

use serde::{Deserialize, Serialize};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use safe_radius::GeoPoint;
/// let point = GeoPoint::new(43.705013, -72.288718);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Smallest selectable anonymity radius, in meters.
pub const MIN_RADIUS_METERS: f64 = 10.0;

/// Largest selectable anonymity radius, in meters.
pub const MAX_RADIUS_METERS: f64 = 5000.0;

/// Slider step for the anonymity radius, in meters.
pub const RADIUS_STEP_METERS: f64 = 10.0;

/// Radius applied before the user touches the slider.
pub const DEFAULT_RADIUS_METERS: f64 = 100.0;

/// Reference point assigned when the user opts out of sharing their live
/// position (Baker Berry Library).
pub const FIXED_LOCATION: GeoPoint = GeoPoint {
    latitude: 43.705013,
    longitude: -72.288718,
};

/// Qualitative reading of an anonymity radius, for the privacy indicator
/// next to the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyLevel {
    Low,
    Medium,
    High,
}

impl PrivacyLevel {
    pub fn for_radius(radius_meters: f64) -> Self {
        if radius_meters < 50.0 {
            Self::Low
        } else if radius_meters < 500.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Indicator text shown alongside the slider.
    pub fn describe(radius_meters: f64) -> String {
        match Self::for_radius(radius_meters) {
            Self::Low => format!("Low privacy - you could be within {}m", radius_meters),
            Self::Medium => format!("Medium privacy - you could be within {}m", radius_meters),
            Self::High => format!(
                "High privacy - you could be anywhere within {}m",
                radius_meters
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
