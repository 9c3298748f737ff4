use bevy::prelude::*;

use crate::engine::systems::session_pump::ArDriver;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for the config document.
    #[default]
    Loading,
    Running,
    /// Session ended by the user or the runtime.
    Ended,
    /// Negotiation failed; nothing runs.
    SessionFailed,
}

#[derive(Component)]
pub struct StatusText;

pub fn announce_session_ended(driver: Option<NonSend<ArDriver>>) {
    println!("→ AR session ended");
    if let Some(driver) = driver {
        let stats = driver.stats();
        println!(
            "  {} frames rendered, {} skipped without pose, {} placed",
            stats.rendered,
            stats.skipped_no_pose,
            driver.placement().placed().len()
        );
    }
}

pub fn announce_session_failed() {
    println!("✗ AR session failed to start");
}
