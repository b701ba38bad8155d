//! Session wiring.
//!
//! Owns the controller, the static heatmap dataset, the position source,
//! and the map view, and keeps them in step: every committed state change
//! is followed by exactly one render with a fully consistent frame.

use crate::controller::{LocationController, PositionRequest};
use crate::heatmap::{CorridorSeed, HeatmapDataset};
use crate::map::{LayerPalette, MapStyle, MapView, PositionSource, RenderFrame, Viewport};

/// One widget instance: controller state plus its external collaborators.
pub struct MapSession<S, V> {
    controller: LocationController,
    heatmap: HeatmapDataset,
    style: MapStyle,
    palette: LayerPalette,
    source: S,
    view: V,
}

impl<S: PositionSource, V: MapView> MapSession<S, V> {
    pub fn new(style: MapStyle, source: S, view: V) -> Self {
        Self::with_controller(LocationController::new(), style, source, view)
    }

    /// Session with a caller-provided controller, for deterministic tests
    /// and demos.
    pub fn with_controller(
        controller: LocationController,
        style: MapStyle,
        source: S,
        view: V,
    ) -> Self {
        Self {
            controller,
            // Created once; never recomputed after startup
            heatmap: HeatmapDataset::generate(&CorridorSeed::default()),
            style,
            palette: LayerPalette::default(),
            source,
            view,
        }
    }

    pub fn controller(&self) -> &LocationController {
        &self.controller
    }

    pub fn heatmap(&self) -> &HeatmapDataset {
        &self.heatmap
    }

    /// Query the position source once at startup.
    ///
    /// Renders the initial (unlocated) frame immediately, then again when
    /// the query completes. Skipped in favor of the fixed point when the
    /// fixed flag is already set.
    pub async fn start(&mut self) {
        if self.controller.use_fixed_location() {
            self.controller.set_use_fixed_location(true);
            self.render();
            return;
        }

        let request = self.controller.begin_position_request();
        self.render();
        self.resolve(request).await;
    }

    /// Slider input: immediate synchronous update and re-render.
    pub fn set_radius(&mut self, radius_meters: f64) {
        self.controller.set_radius(radius_meters);
        self.render();
    }

    /// Checkbox input. Setting the flag renders synchronously; clearing it
    /// renders the interim state, then queries the source and renders the
    /// outcome.
    pub async fn set_use_fixed_location(&mut self, flag: bool) {
        match self.controller.set_use_fixed_location(flag) {
            Some(request) => {
                self.render();
                self.resolve(request).await;
            }
            None => self.render(),
        }
    }

    /// User pan/zoom event from the view.
    pub fn viewport_changed(&mut self, viewport: Viewport) {
        self.controller.viewport_changed(viewport);
        self.render();
    }

    async fn resolve(&mut self, request: PositionRequest) {
        let query = self.source.current_position();
        match query.await {
            Ok(point) => self.controller.position_resolved(request, point),
            Err(err) => self.controller.position_failed(request, &err),
        }
        self.render();
    }

    fn render(&mut self) {
        let frame = RenderFrame {
            marker: self.controller.display_location(),
            region: self.controller.region(),
            heatmap: &self.heatmap,
            viewport: self.controller.viewport(),
            style: &self.style,
            palette: &self.palette,
        };
        self.view.render(&frame);
    }
}
