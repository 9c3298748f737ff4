use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::engine::render::BevyRenderTarget;
use crate::engine::scene::OverlayCanvas;
use crate::engine::scheduler::{ArSessionDriver, DriverEvent, FrameOutcome};
use crate::engine::simulation::SimulatedControl;
use crate::tools::placement::SelectOutcome;

/// The driver as installed in the app: bevy render bridge plus the overlay
/// pixel buffer.
pub type ArDriver = ArSessionDriver<BevyRenderTarget, OverlayCanvas>;

/// Advance the simulated runtime to the current app time.
pub fn advance_simulated_tracking(control: Option<NonSend<SimulatedControl>>, time: Res<Time>) {
    if let Some(control) = control {
        control.tick(time.elapsed_secs_f64());
    }
}

/// Deliver queued session events to the driver, in order.
pub fn pump_session_events(
    driver: Option<NonSendMut<ArDriver>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut tracking_lost: Local<bool>,
) {
    let Some(mut driver) = driver else {
        return;
    };

    for event in driver.pump() {
        match event {
            DriverEvent::Frame(FrameOutcome::SkippedNoPose) if !*tracking_lost => {
                *tracking_lost = true;
                debug!("Tracking lost, holding last frame");
            }
            DriverEvent::Frame(FrameOutcome::Rendered { .. }) if *tracking_lost => {
                *tracking_lost = false;
                debug!("Tracking recovered");
            }
            DriverEvent::Select(SelectOutcome::TemplateNotLoaded) => {
                debug!("Select ignored: placeable model still loading");
            }
            DriverEvent::Select(SelectOutcome::NoSurface) => {
                debug!("Select ignored: no surface under the reticle yet");
            }
            _ => {}
        }
    }

    if !driver.is_active() {
        next_state.set(AppState::Ended);
    }
}
