use bevy::prelude::*;
use bevy::window::PresentMode;
#[cfg(not(target_arch = "wasm32"))]
use constants::simulation::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            transparent: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "AR Placement".into(),
            resolution: (VIEWPORT_WIDTH as f32, VIEWPORT_HEIGHT as f32).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
