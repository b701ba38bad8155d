//! Map view adapter surface.
//!
//! The crate never draws tiles itself. It hands an external view a
//! [`RenderFrame`]: the marker position, the uncertainty region, the static
//! heatmap dataset, the viewport, and declarative paint descriptions in the
//! map library's vocabulary (sources as GeoJSON, ramps keyed on zoom or on
//! the per-point `heat` attribute). The view renders; the host feeds
//! pan/zoom events and position results back through the controller.

use crate::heatmap::HeatmapDataset;
use crate::region::UncertaintyRegion;
use crate::GeoPoint;
use futures::future::LocalBoxFuture;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Environment variable the map access token is read from.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Light base style used by the demo widget.
pub const LIGHT_STYLE: &str = "mapbox://styles/mapbox/light-v11";

/// Viewport center before any position has resolved (New York City).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 40.7128,
    longitude: -74.0060,
};

pub const DEFAULT_ZOOM: f64 = 13.0;

/// Current map view: center and zoom. Pan/zoom events replace it wholesale;
/// recentering keeps the zoom and moves the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Same zoom, new center.
    pub fn recentered(&self, center: GeoPoint) -> Self {
        Self {
            center,
            zoom: self.zoom,
        }
    }
}

/// Base style identifier plus the access credential the tile service wants.
///
/// There is no hard-coded default token: a missing environment variable
/// logs a warning and leaves an empty placeholder, which renders no tiles
/// but keeps everything else functional.
#[derive(Debug, Clone, Serialize)]
pub struct MapStyle {
    pub style_url: String,
    pub access_token: String,
}

impl MapStyle {
    /// Light style with the token from [`ACCESS_TOKEN_ENV`].
    pub fn from_env() -> Self {
        let access_token = std::env::var(ACCESS_TOKEN_ENV).unwrap_or_else(|_| {
            warn!(
                "{} is not set; map tiles will not load until a token is provided",
                ACCESS_TOKEN_ENV
            );
            String::new()
        });

        Self {
            style_url: LIGHT_STYLE.to_string(),
            access_token,
        }
    }

    pub fn with_token(style_url: &str, access_token: &str) -> Self {
        Self {
            style_url: style_url.to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

// ============================================================================
// Layer paint descriptions
// ============================================================================

/// Fill paint for the uncertainty circle interior.
#[derive(Debug, Clone, Serialize)]
pub struct FillPaint {
    pub color: String,
    pub opacity: f64,
}

impl Default for FillPaint {
    fn default() -> Self {
        Self {
            color: "#007cbf".to_string(),
            opacity: 0.2,
        }
    }
}

/// Line paint for the uncertainty circle outline.
#[derive(Debug, Clone, Serialize)]
pub struct LinePaint {
    pub color: String,
    pub width: f64,
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            color: "#007cbf".to_string(),
            width: 2.0,
        }
    }
}

/// Marker style for the displayed location.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerStyle {
    pub color: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
        }
    }
}

/// Heatmap paint ramps: weight keyed on the per-point `heat` attribute,
/// intensity and radius keyed on zoom, color keyed on rendered density.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapPaint {
    /// (heat, weight) stops
    pub weight_stops: Vec<(f64, f64)>,
    /// (zoom, intensity) stops
    pub intensity_stops: Vec<(f64, f64)>,
    /// (density, color) stops
    pub color_stops: Vec<(f64, String)>,
    /// (zoom, radius) stops
    pub radius_stops: Vec<(f64, f64)>,
    pub opacity: f64,
}

impl Default for HeatmapPaint {
    fn default() -> Self {
        Self {
            weight_stops: vec![(50.0, 0.5), (100.0, 1.0)],
            intensity_stops: vec![(0.0, 0.5), (20.0, 1.5)],
            color_stops: vec![
                (0.0, "rgba(33,102,172,0)".to_string()),
                (0.2, "rgb(103,169,207)".to_string()),
                (0.4, "rgb(209,229,240)".to_string()),
                (0.6, "rgb(253,219,199)".to_string()),
                (0.8, "rgb(239,138,98)".to_string()),
                (1.0, "rgb(178,24,43)".to_string()),
            ],
            radius_stops: vec![(0.0, 2.0), (20.0, 30.0)],
            opacity: 0.7,
        }
    }
}

impl HeatmapPaint {
    /// Paint object in the map library's expression syntax.
    pub fn to_paint_json(&self) -> Value {
        json!({
            "heatmap-weight": interpolate_expr(json!(["get", "heat"]), &self.weight_stops),
            "heatmap-intensity": interpolate_expr(json!(["zoom"]), &self.intensity_stops),
            "heatmap-color": interpolate_color_expr(
                json!(["heatmap-density"]),
                &self.color_stops,
            ),
            "heatmap-radius": interpolate_expr(json!(["zoom"]), &self.radius_stops),
            "heatmap-opacity": self.opacity,
        })
    }
}

fn interpolate_expr(input: Value, stops: &[(f64, f64)]) -> Value {
    let mut expr = vec![json!("interpolate"), json!(["linear"]), input];
    for (key, value) in stops {
        expr.push(json!(key));
        expr.push(json!(value));
    }
    Value::Array(expr)
}

fn interpolate_color_expr(input: Value, stops: &[(f64, String)]) -> Value {
    let mut expr = vec![json!("interpolate"), json!(["linear"]), input];
    for (key, color) in stops {
        expr.push(json!(key));
        expr.push(json!(color));
    }
    Value::Array(expr)
}

/// All paints bundled, so a session can restyle the widget in one place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayerPalette {
    pub fill: FillPaint,
    pub outline: LinePaint,
    pub marker: MarkerStyle,
    pub heatmap: HeatmapPaint,
}

// ============================================================================
// User-facing control descriptors
// ============================================================================

/// Declarative slider bound to the anonymity radius.
#[derive(Debug, Clone, Serialize)]
pub struct RadiusSlider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl RadiusSlider {
    pub fn for_radius(value: f64) -> Self {
        Self {
            min: crate::MIN_RADIUS_METERS,
            max: crate::MAX_RADIUS_METERS,
            step: crate::RADIUS_STEP_METERS,
            value,
        }
    }
}

/// Declarative checkbox bound to the fixed-location flag.
#[derive(Debug, Clone, Serialize)]
pub struct FixedLocationCheckbox {
    pub label: String,
    pub checked: bool,
}

impl FixedLocationCheckbox {
    pub fn new(checked: bool) -> Self {
        Self {
            label: "Set my location to Baker Berry Library".to_string(),
            checked,
        }
    }
}

// ============================================================================
// Render frame and collaborator traits
// ============================================================================

/// Everything a view needs to draw one consistent frame.
///
/// The marker and region are always derived from the same committed state;
/// the true location is never part of a frame.
#[derive(Debug)]
pub struct RenderFrame<'a> {
    pub marker: Option<GeoPoint>,
    pub region: Option<&'a UncertaintyRegion>,
    pub heatmap: &'a HeatmapDataset,
    pub viewport: Viewport,
    pub style: &'a MapStyle,
    pub palette: &'a LayerPalette,
}

impl RenderFrame<'_> {
    /// Declarative layer stack: the heatmap layer, plus the circle fill and
    /// outline layers when a region exists. The marker travels separately
    /// in [`RenderFrame::marker`].
    pub fn layer_documents(&self) -> Vec<Value> {
        let mut layers = Vec::with_capacity(3);

        if let Some(region) = self.region {
            let source = region.to_polygon_feature();
            layers.push(json!({
                "id": "uncertainty-fill",
                "type": "fill",
                "source": source.clone(),
                "paint": {
                    "fill-color": self.palette.fill.color.clone(),
                    "fill-opacity": self.palette.fill.opacity,
                },
            }));
            layers.push(json!({
                "id": "uncertainty-outline",
                "type": "line",
                "source": source,
                "paint": {
                    "line-color": self.palette.outline.color.clone(),
                    "line-width": self.palette.outline.width,
                },
            }));
        }

        layers.push(json!({
            "id": "density-heatmap",
            "type": "heatmap",
            "source": self.heatmap.to_feature_collection(),
            "paint": self.palette.heatmap.to_paint_json(),
        }));

        layers
    }
}

/// Failure reported by a position source. The platform does not distinguish
/// permission denial from unavailability or timeout, and neither do we.
#[derive(Debug, Clone, Error)]
#[error("could not resolve position: {reason}")]
pub struct PositionError {
    pub reason: String,
}

impl PositionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One-shot device position query.
///
/// The future resolves with a coordinate or a failure; there is no timeout
/// or cancellation here. Stale results are dropped by the controller's
/// last-write-wins check, so sources need not worry about ordering.
pub trait PositionSource {
    fn current_position(&mut self) -> LocalBoxFuture<'static, Result<GeoPoint, PositionError>>;
}

/// External renderer. Called with a fully consistent frame after every
/// committed state change.
pub trait MapView {
    fn render(&mut self, frame: &RenderFrame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::{CorridorSeed, HeatmapDataset};

    #[test]
    fn test_viewport_recentered_keeps_zoom() {
        let viewport = Viewport {
            center: DEFAULT_CENTER,
            zoom: 15.5,
        };
        let moved = viewport.recentered(GeoPoint::new(43.705013, -72.288718));
        assert_eq!(moved.zoom, 15.5);
        assert_eq!(moved.center.latitude, 43.705013);
    }

    #[test]
    fn test_heatmap_paint_expressions() {
        let paint = HeatmapPaint::default().to_paint_json();

        let weight = paint["heatmap-weight"].as_array().unwrap();
        assert_eq!(weight[0], "interpolate");
        assert_eq!(weight[2], json!(["get", "heat"]));
        // 3 header elements + 2 stops of 2
        assert_eq!(weight.len(), 7);

        let color = paint["heatmap-color"].as_array().unwrap();
        assert_eq!(color[2], json!(["heatmap-density"]));
        assert_eq!(color.len(), 3 + 6 * 2);

        assert_eq!(paint["heatmap-opacity"], 0.7);
    }

    #[test]
    fn test_layer_documents_without_region() {
        let heatmap = HeatmapDataset::generate(&CorridorSeed::default());
        let style = MapStyle::with_token(LIGHT_STYLE, "test-token");
        let palette = LayerPalette::default();

        let frame = RenderFrame {
            marker: None,
            region: None,
            heatmap: &heatmap,
            viewport: Viewport::default(),
            style: &style,
            palette: &palette,
        };

        let layers = frame.layer_documents();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0]["type"], "heatmap");
    }

    #[test]
    fn test_layer_documents_with_region() {
        let heatmap = HeatmapDataset::generate(&CorridorSeed::default());
        let style = MapStyle::with_token(LIGHT_STYLE, "test-token");
        let palette = LayerPalette::default();
        let region =
            UncertaintyRegion::around(GeoPoint::new(43.705013, -72.288718), 100.0);

        let frame = RenderFrame {
            marker: Some(region.center()),
            region: Some(&region),
            heatmap: &heatmap,
            viewport: Viewport::default(),
            style: &style,
            palette: &palette,
        };

        let layers = frame.layer_documents();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0]["id"], "uncertainty-fill");
        assert_eq!(layers[1]["id"], "uncertainty-outline");
        assert_eq!(layers[2]["id"], "density-heatmap");
        assert_eq!(layers[0]["paint"]["fill-color"], "#007cbf");
        assert_eq!(layers[1]["paint"]["line-width"], 2.0);
    }

    #[test]
    fn test_slider_descriptor_matches_domain() {
        let slider = RadiusSlider::for_radius(250.0);
        assert_eq!(slider.min, 10.0);
        assert_eq!(slider.max, 5000.0);
        assert_eq!(slider.step, 10.0);
        assert_eq!(slider.value, 250.0);
    }

    #[test]
    fn test_checkbox_descriptor() {
        let checkbox = FixedLocationCheckbox::new(false);
        assert!(!checkbox.checked);
        assert!(checkbox.label.contains("Baker Berry"));
    }

    #[test]
    fn test_style_without_token_is_placeholder() {
        std::env::remove_var(ACCESS_TOKEN_ENV);
        let style = MapStyle::from_env();
        assert_eq!(style.style_url, LIGHT_STYLE);
        assert!(!style.has_token());
    }
}
