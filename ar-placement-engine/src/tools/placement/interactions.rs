use bevy::prelude::*;

use crate::engine::simulation::SimulatedControl;
use crate::engine::systems::session_pump::ArDriver;

/// Left click or a new touch is the select gesture. It goes through the
/// runtime so it is delivered like any other session event.
pub fn select_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    control: Option<NonSend<SimulatedControl>>,
) {
    if !buttons.just_pressed(MouseButton::Left) && !touches.any_just_pressed() {
        return;
    }
    let Some(control) = control else {
        return;
    };
    if !control.select() {
        debug!("Select dropped: session has no select listener");
    }
}

/// Escape ends the AR session from the app side.
pub fn end_session_on_escape(
    keys: Res<ButtonInput<KeyCode>>,
    driver: Option<NonSendMut<ArDriver>>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    if let Some(mut driver) = driver {
        info!("Escape pressed, ending AR session");
        driver.end();
    }
}
