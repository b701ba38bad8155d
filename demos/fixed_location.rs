//! Walkthrough of a widget session with a stubbed position source.
//!
//! Run with: cargo run --example fixed_location

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use safe_radius::{
    GeoPoint, LocationController, MapSession, MapStyle, MapView, PositionError, PositionSource,
    PrivacyLevel, RenderFrame, Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Pretends to be the platform geolocation capability. The shared handle
/// lets the demo flip it into a failing state mid-session.
struct StubGeolocation {
    position: Rc<RefCell<Option<GeoPoint>>>,
}

impl PositionSource for StubGeolocation {
    fn current_position(&mut self) -> LocalBoxFuture<'static, Result<GeoPoint, PositionError>> {
        let result = self
            .position
            .borrow()
            .ok_or_else(|| PositionError::new("permission denied"));
        async move { result }.boxed_local()
    }
}

/// Prints each frame instead of drawing tiles.
struct ConsoleView {
    frame_no: usize,
}

impl MapView for ConsoleView {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        self.frame_no += 1;
        println!("frame {}:", self.frame_no);
        println!(
            "  viewport: ({:.4}, {:.4}) @ z{}",
            frame.viewport.center.latitude, frame.viewport.center.longitude, frame.viewport.zoom
        );

        match frame.marker {
            Some(marker) => println!(
                "  marker:   ({:.6}, {:.6})",
                marker.latitude, marker.longitude
            ),
            None => println!("  marker:   (none)"),
        }

        if let Some(region) = frame.region {
            println!(
                "  region:   {:.0}m radius, {} ring vertices",
                region.radius_meters(),
                region.ring().len()
            );
        }

        println!("  layers:   {}", frame.layer_documents().len());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let position = Rc::new(RefCell::new(Some(GeoPoint::new(43.706708, -72.293074))));

    let mut session = MapSession::with_controller(
        LocationController::new(),
        MapStyle::from_env(),
        StubGeolocation {
            position: Rc::clone(&position),
        },
        ConsoleView { frame_no: 0 },
    );

    println!("-- startup: live position resolves --");
    session.start().await;

    println!("\n-- widen the anonymity radius to 1km --");
    session.set_radius(1000.0);
    println!("   {}", PrivacyLevel::describe(1000.0));

    println!("\n-- opt out: pin to the fixed reference point --");
    session.set_use_fixed_location(true).await;

    println!("\n-- opt back in while the platform refuses --");
    position.replace(None);
    // The prior marker and region stay on screen; the failure is only logged.
    session.set_use_fixed_location(false).await;

    println!("\n-- pan away: locations are untouched --");
    session.viewport_changed(Viewport {
        center: GeoPoint::new(43.70, -72.29),
        zoom: 15.0,
    });
}
