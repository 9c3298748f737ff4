use bevy::prelude::*;
use constants::render_settings::{DEPTH_GRID_STRIDE, DEPTH_INTENSITY_SCALE, DEPTH_OVERLAY_ALPHA};

use crate::engine::session::DepthInformation;

/// 2D surface the depth grid is painted onto.
pub trait DepthCanvas {
    fn size(&self) -> UVec2;
    fn clear(&mut self);
    fn fill_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]);
}

/// Metres to 8-bit greyscale: `clamp(depth * 255, 0, 255)`. Non-finite
/// readings paint black.
pub fn depth_to_intensity(depth_m: f32) -> u8 {
    if !depth_m.is_finite() {
        return 0;
    }
    (depth_m * DEPTH_INTENSITY_SCALE).clamp(0.0, 255.0).round() as u8
}

/// Paints a sparse grid of depth samples instead of every pixel.
#[derive(Debug, Clone, Copy)]
pub struct DepthVisualizer {
    stride: u32,
    alpha: u8,
}

impl Default for DepthVisualizer {
    fn default() -> Self {
        Self::new(DEPTH_GRID_STRIDE, DEPTH_OVERLAY_ALPHA)
    }
}

impl DepthVisualizer {
    pub fn new(stride: u32, alpha: f32) -> Self {
        Self {
            stride: stride.max(1),
            alpha: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Clear the canvas and paint one pixel every `stride` pixels. Returns
    /// the number of samples painted.
    pub fn paint(&self, depth: &dyn DepthInformation, canvas: &mut dyn DepthCanvas) -> usize {
        let size = canvas.size();
        canvas.clear();
        if size.x == 0 || size.y == 0 {
            return 0;
        }

        let mut painted = 0;
        for x in (0..size.x).step_by(self.stride as usize) {
            for y in (0..size.y).step_by(self.stride as usize) {
                let u = x as f32 / size.x as f32;
                let v = y as f32 / size.y as f32;
                let intensity = depth_to_intensity(depth.depth_in_meters(u, v));
                canvas.fill_pixel(x, y, [intensity, intensity, intensity, self.alpha]);
                painted += 1;
            }
        }
        painted
    }
}

/// RGBA8 pixel buffer backing the on-screen overlay image.
#[derive(Debug, Clone)]
pub struct OverlayCanvas {
    size: UVec2,
    pixels: Vec<u8>,
    dirty: bool,
}

impl OverlayCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            pixels: vec![0; (width * height * 4) as usize],
            dirty: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let i = ((y * self.size.x + x) * 4) as usize;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Resize to match a new viewport, discarding contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size == UVec2::new(width, height) {
            return;
        }
        *self = Self::new(width, height);
    }

    /// Returns whether pixels changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl DepthCanvas for OverlayCanvas {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
        self.dirty = true;
    }

    fn fill_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.size.x || y >= self.size.y {
            return;
        }
        let i = ((y * self.size.x + x) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantDepth(f32);

    impl DepthInformation for ConstantDepth {
        fn width(&self) -> u32 {
            8
        }
        fn height(&self) -> u32 {
            8
        }
        fn depth_in_meters(&self, _u: f32, _v: f32) -> f32 {
            self.0
        }
    }

    fn sampled_pixels(canvas: &OverlayCanvas, stride: u32) -> Vec<[u8; 4]> {
        let mut out = Vec::new();
        for x in (0..canvas.size().x).step_by(stride as usize) {
            for y in (0..canvas.size().y).step_by(stride as usize) {
                out.push(canvas.pixel(x, y).unwrap());
            }
        }
        out
    }

    #[test]
    fn intensity_is_clamped() {
        assert_eq!(depth_to_intensity(0.0), 0);
        assert_eq!(depth_to_intensity(0.5), 128);
        assert_eq!(depth_to_intensity(1.0), 255);
        assert_eq!(depth_to_intensity(3.7), 255);
        assert_eq!(depth_to_intensity(-1.0), 0);
        assert_eq!(depth_to_intensity(f32::NAN), 0);
    }

    #[test]
    fn constant_depth_paints_uniform_grey() {
        for depth in [0.2_f32, 0.75, 1.0, 2.5] {
            let mut canvas = OverlayCanvas::new(100, 60);
            let visualizer = DepthVisualizer::new(20, 0.5);
            let painted = visualizer.paint(&ConstantDepth(depth), &mut canvas);

            // 0, 20, 40, 60, 80 across; 0, 20, 40 down
            assert_eq!(painted, 15);
            let expected = depth_to_intensity(depth);
            for [r, g, b, a] in sampled_pixels(&canvas, 20) {
                assert_eq!([r, g, b], [expected; 3]);
                assert_eq!(a, 128);
            }
        }
    }

    #[test]
    fn only_grid_pixels_are_painted() {
        let mut canvas = OverlayCanvas::new(41, 41);
        DepthVisualizer::new(20, 1.0).paint(&ConstantDepth(1.0), &mut canvas);

        assert_eq!(canvas.pixel(20, 40), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(21, 20), Some([0, 0, 0, 0]));
    }

    #[test]
    fn paint_clears_previous_frame() {
        let mut canvas = OverlayCanvas::new(10, 10);
        canvas.fill_pixel(5, 5, [9, 9, 9, 9]);
        DepthVisualizer::new(20, 0.5).paint(&ConstantDepth(1.0), &mut canvas);
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 0]));
    }
}
