/// Viewer eye height above the local origin (metres).
pub const EYE_HEIGHT: f32 = 1.6;

/// Radius of the simulated viewer's orbit around the origin.
pub const ORBIT_RADIUS: f32 = 1.5;

/// Radians per second.
pub const ORBIT_SPEED: f32 = 0.25;

/// Vertical offset of the look-at target below eye level.
pub const LOOK_DOWN: f32 = 1.2;

pub const FLOOR_HEIGHT: f32 = 0.0;

pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 720;

pub const FIELD_OF_VIEW_Y: f32 = 1.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Resolution of the synthetic depth map.
pub const DEPTH_WIDTH: u32 = 160;
pub const DEPTH_HEIGHT: u32 = 90;
