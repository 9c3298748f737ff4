use bevy::prelude::*;

/// Loading milestones, read by state transitions and the status HUD.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub session_started: bool,
    pub reticle_loaded: bool,
    pub placeable_loaded: bool,
}

impl LoadingProgress {
    pub fn models_loaded(&self) -> bool {
        self.reticle_loaded && self.placeable_loaded
    }
}
