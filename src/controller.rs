//! Location state controller.
//!
//! Single source of truth for the true location, the displayed location,
//! the anonymity radius, the fixed-location flag, and the derived
//! uncertainty region. Every setter recomputes all dependent state
//! synchronously before returning, so a renderer can never observe a
//! displayed location paired with a stale region.
//!
//! The true location is held privately and has no accessor: only the
//! displayed location and the region ever leave this struct.

use crate::anonymize;
use crate::map::{PositionError, Viewport};
use crate::region::UncertaintyRegion;
use crate::{GeoPoint, FIXED_LOCATION, MAX_RADIUS_METERS, MIN_RADIUS_METERS};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Reachable controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No true location yet and no request in flight.
    Uninitialized,
    /// A position request is in flight. Previously displayed state, if any,
    /// stays visible until the request resolves.
    Resolving,
    /// A true location is held and the derived state is valid.
    Located,
}

/// Token identifying one in-flight position request.
///
/// Resolutions carrying a token that has been superseded by a later request
/// or a fixed-location assignment are dropped (last-write-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    seq: u64,
}

pub struct LocationController {
    true_location: Option<GeoPoint>,
    display_location: Option<GeoPoint>,
    region: Option<UncertaintyRegion>,
    radius_meters: f64,
    use_fixed_location: bool,
    viewport: Viewport,
    /// Bumped on every request issue and every true-location assignment.
    seq: u64,
    /// Sequence number of the outstanding request, if any.
    pending: Option<u64>,
    rng: SmallRng,
}

impl LocationController {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Controller with a caller-provided RNG, for deterministic tests.
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            true_location: None,
            display_location: None,
            region: None,
            radius_meters: crate::DEFAULT_RADIUS_METERS,
            use_fixed_location: false,
            viewport: Viewport::default(),
            seq: 0,
            pending: None,
            rng,
        }
    }

    pub fn state(&self) -> ControllerState {
        if self.pending.is_some() {
            ControllerState::Resolving
        } else if self.true_location.is_some() {
            ControllerState::Located
        } else {
            ControllerState::Uninitialized
        }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn use_fixed_location(&self) -> bool {
        self.use_fixed_location
    }

    pub fn display_location(&self) -> Option<GeoPoint> {
        self.display_location
    }

    pub fn region(&self) -> Option<&UncertaintyRegion> {
        self.region.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Set the anonymity radius, clamped to the slider domain.
    ///
    /// While a true location is held, the displayed location is freshly
    /// resampled and the region rebuilt before this returns. The viewport
    /// is left alone.
    pub fn set_radius(&mut self, radius_meters: f64) {
        let clamped = radius_meters.clamp(MIN_RADIUS_METERS, MAX_RADIUS_METERS);
        if clamped != radius_meters {
            debug!("radius {}m clamped to {}m", radius_meters, clamped);
        }
        self.radius_meters = clamped;

        if self.true_location.is_some() {
            self.refresh_derived(false);
        }
    }

    /// Toggle the fixed-location flag.
    ///
    /// `true` assigns the fixed reference point immediately and supersedes
    /// any in-flight request; returns `None`. `false` issues a new position
    /// request for the host to fulfil; prior displayed state stays visible
    /// until it resolves.
    pub fn set_use_fixed_location(&mut self, flag: bool) -> Option<PositionRequest> {
        self.use_fixed_location = flag;

        if flag {
            info!("using fixed reference location");
            self.pending = None;
            self.assign_true_location(FIXED_LOCATION);
            None
        } else {
            Some(self.begin_position_request())
        }
    }

    /// Issue a position request token and enter `Resolving`.
    pub fn begin_position_request(&mut self) -> PositionRequest {
        self.seq += 1;
        self.pending = Some(self.seq);
        debug!("position request #{} started", self.seq);
        PositionRequest { seq: self.seq }
    }

    /// Apply a resolved position, unless the request was superseded.
    pub fn position_resolved(&mut self, request: PositionRequest, point: GeoPoint) {
        if self.pending != Some(request.seq) {
            debug!("dropping superseded position result (request #{})", request.seq);
            return;
        }
        self.pending = None;
        info!("position request #{} resolved", request.seq);
        self.assign_true_location(point);
    }

    /// Record a position failure. Prior displayed state is left untouched;
    /// there is no retry and no automatic fall-back to the fixed location.
    pub fn position_failed(&mut self, request: PositionRequest, error: &PositionError) {
        if self.pending == Some(request.seq) {
            self.pending = None;
        }
        warn!("could not find you: {}", error);
    }

    /// Accept a user pan/zoom. Locations are never touched.
    pub fn viewport_changed(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn assign_true_location(&mut self, point: GeoPoint) {
        // Supersedes any result still in flight
        self.seq += 1;
        self.true_location = Some(point);
        self.refresh_derived(true);
    }

    /// Resample the displayed location and rebuild the region from current
    /// state; committed together so no stale pairing is observable.
    fn refresh_derived(&mut self, recenter: bool) {
        if let Some(actual) = self.true_location {
            let display =
                anonymize::anonymized_location(&actual, self.radius_meters, &mut self.rng);
            self.region = Some(UncertaintyRegion::around(display, self.radius_meters));
            self.display_location = Some(display);

            if recenter {
                self.viewport = self.viewport.recentered(display);
            }
        }
    }
}

impl Default for LocationController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils;

    fn controller(seed: u64) -> LocationController {
        LocationController::with_rng(SmallRng::seed_from_u64(seed))
    }

    const TRUE_POINT: GeoPoint = GeoPoint {
        latitude: 43.706708,
        longitude: -72.293074,
    };

    #[test]
    fn test_starts_uninitialized() {
        let c = controller(1);
        assert_eq!(c.state(), ControllerState::Uninitialized);
        assert!(c.display_location().is_none());
        assert!(c.region().is_none());
        assert_eq!(c.radius_meters(), 100.0);
    }

    #[test]
    fn test_fixed_location_transitions_to_located() {
        let mut c = controller(2);
        let request = c.set_use_fixed_location(true);

        assert!(request.is_none());
        assert_eq!(c.state(), ControllerState::Located);

        let display = c.display_location().unwrap();
        let dist = geo_utils::haversine_distance(&FIXED_LOCATION, &display);
        assert!(dist <= c.radius_meters() * 1.01);
    }

    #[test]
    fn test_fixed_location_overrides_resolved_position() {
        let mut c = controller(3);
        let request = c.begin_position_request();
        c.position_resolved(request, TRUE_POINT);

        c.set_use_fixed_location(true);

        let display = c.display_location().unwrap();
        let dist = geo_utils::haversine_distance(&FIXED_LOCATION, &display);
        assert!(dist <= c.radius_meters() * 1.01);
    }

    #[test]
    fn test_resolution_recomputes_and_recenters() {
        let mut c = controller(4);
        let request = c.begin_position_request();
        assert_eq!(c.state(), ControllerState::Resolving);

        c.position_resolved(request, TRUE_POINT);

        assert_eq!(c.state(), ControllerState::Located);
        let display = c.display_location().unwrap();
        assert!(geo_utils::haversine_distance(&TRUE_POINT, &display) <= 101.0);

        // Region is centered on the display location, and the true point
        // sits within its radius (1% slack for the flat-Earth offset).
        let region = c.region().unwrap();
        assert_eq!(region.center(), display);
        let dist = geo_utils::haversine_distance(&display, &TRUE_POINT);
        assert!(dist <= region.radius_meters() * 1.01);

        // Viewport recentered on the display location, zoom kept
        assert_eq!(c.viewport().center, display);
        assert_eq!(c.viewport().zoom, Viewport::default().zoom);
    }

    #[test]
    fn test_radius_change_resamples_display_and_region() {
        let mut c = controller(5);
        c.set_use_fixed_location(true);
        let before = c.display_location().unwrap();

        c.set_radius(500.0);

        let after = c.display_location().unwrap();
        assert_ne!(before, after);

        let region = c.region().unwrap();
        assert_eq!(region.center(), after);
        assert_eq!(region.radius_meters(), 500.0);

        // New display still within the new radius of the fixed point
        let dist = geo_utils::haversine_distance(&FIXED_LOCATION, &after);
        assert!(dist <= 500.0 * 1.01);
    }

    #[test]
    fn test_radius_change_does_not_recenter() {
        let mut c = controller(6);
        c.set_use_fixed_location(true);

        let panned = Viewport {
            center: GeoPoint::new(40.0, -74.0),
            zoom: 9.0,
        };
        c.viewport_changed(panned);
        c.set_radius(1000.0);

        assert_eq!(c.viewport(), panned);
    }

    #[test]
    fn test_radius_clamped_to_domain() {
        let mut c = controller(7);
        c.set_radius(3.0);
        assert_eq!(c.radius_meters(), MIN_RADIUS_METERS);
        c.set_radius(99_999.0);
        assert_eq!(c.radius_meters(), MAX_RADIUS_METERS);
    }

    #[test]
    fn test_radius_change_before_location_is_inert() {
        let mut c = controller(8);
        c.set_radius(2000.0);
        assert_eq!(c.radius_meters(), 2000.0);
        assert!(c.display_location().is_none());
        assert!(c.region().is_none());
    }

    #[test]
    fn test_stale_resolution_is_dropped() {
        let mut c = controller(9);
        let first = c.begin_position_request();
        let second = c.begin_position_request();

        c.position_resolved(first, GeoPoint::new(0.0, 0.0));
        assert!(c.display_location().is_none());

        c.position_resolved(second, TRUE_POINT);
        let display = c.display_location().unwrap();
        assert!(geo_utils::haversine_distance(&TRUE_POINT, &display) <= 101.0);
    }

    #[test]
    fn test_resolution_after_fixed_assignment_is_dropped() {
        let mut c = controller(10);
        let request = c.begin_position_request();
        c.set_use_fixed_location(true);
        let display = c.display_location().unwrap();

        c.position_resolved(request, GeoPoint::new(0.0, 0.0));

        assert_eq!(c.display_location().unwrap(), display);
    }

    #[test]
    fn test_failure_leaves_prior_state() {
        let mut c = controller(11);
        c.set_use_fixed_location(true);
        let display = c.display_location().unwrap();
        let region = c.region().unwrap().clone();

        let request = c.set_use_fixed_location(false).unwrap();
        c.position_failed(request, &PositionError::new("permission denied"));

        assert_eq!(c.display_location().unwrap(), display);
        assert_eq!(*c.region().unwrap(), region);
        assert_eq!(c.state(), ControllerState::Located);
    }

    #[test]
    fn test_failure_without_prior_state() {
        let mut c = controller(12);
        let request = c.begin_position_request();
        c.position_failed(request, &PositionError::new("unavailable"));

        assert_eq!(c.state(), ControllerState::Uninitialized);
        assert!(c.display_location().is_none());
    }

    #[test]
    fn test_viewport_changes_never_touch_locations() {
        let mut c = controller(13);
        c.set_use_fixed_location(true);
        let display = c.display_location().unwrap();

        c.viewport_changed(Viewport {
            center: GeoPoint::new(51.5, -0.1),
            zoom: 4.0,
        });

        assert_eq!(c.display_location().unwrap(), display);
        assert_eq!(c.viewport().zoom, 4.0);
    }
}
