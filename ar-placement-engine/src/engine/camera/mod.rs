//! Tracked camera for the AR scene.
//!
//! The camera never derives its own matrices: every tracked frame copies the
//! view's transform and projection onto it verbatim.

/// Explicit-matrix camera synchronised from the current frame's view.
pub mod xr_camera;

pub use xr_camera::XrCamera;
