//! Scene renderer seam and its bevy-backed implementation.
//!
//! The frame scheduler only ever talks to [`SceneRenderer`]; the bridge
//! turns those calls into ECS entities, camera settings and the depth
//! overlay image.

use bevy::prelude::*;

use crate::engine::camera::XrCamera;
use crate::engine::scene::SceneGraph;

/// Mirrors the scene graph into bevy entities and owns the overlay image.
pub mod bevy_bridge;

pub use bevy_bridge::{
    ArCamera, BevyRenderTarget, DepthOverlayImage, RenderSubmission, SceneEntityMap,
    SceneNodeEntity, apply_render_submission, clear_scene_entities, spawn_ar_camera,
    spawn_depth_overlay, upload_depth_overlay,
};

/// Draws a scene through a camera.
pub trait SceneRenderer {
    /// Match the drawing surface to the runtime's viewport. Called before
    /// every draw.
    fn set_size(&mut self, size: UVec2);

    fn render(&mut self, scene: &SceneGraph, camera: &XrCamera);
}
