use bevy::color::Color;

/// Pixel stride of the sparse depth visualisation grid.
pub const DEPTH_GRID_STRIDE: u32 = 20;

/// Metres to 8-bit intensity. Result is clamped to [0, 255].
pub const DEPTH_INTENSITY_SCALE: f32 = 255.0;

pub const DEPTH_OVERLAY_ALPHA: f32 = 0.5;

pub const LIGHT_INTENSITY: f32 = 0.3;
pub const LIGHT_HEIGHT: f32 = 10.0;

/// Bevy illuminance (lux) corresponding to an intensity of 1.0.
pub const LIGHT_LUX_PER_UNIT: f32 = 10_000.0;

pub const SHADOW_PLANE_SIZE: f32 = 4.0;
pub const SHADOW_PLANE_COLOUR: Color = Color::srgba(0.0, 0.0, 0.0, 0.3);

/// Overlay clear colour so the camera feed shows through.
pub const CLEAR_COLOUR: Color = Color::srgba(0.0, 0.0, 0.0, 0.0);
