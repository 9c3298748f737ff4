use bevy::math::{Mat4, Quat, UVec2, Vec3};

use crate::engine::session::{FrameRequestId, HitTestSource, ReferenceSpace};

/// Rigid transform (position + orientation) expressed in some reference space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Column-major 4x4 matrix, as handed to the renderer.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (_, orientation, position) = matrix.to_scale_rotation_translation();
        Self::new(position, orientation)
    }

    pub fn inverse(&self) -> Self {
        let orientation = self.orientation.inverse();
        Self::new(orientation * -self.position, orientation)
    }

    /// `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Pose) -> Self {
        Self::new(
            self.position + self.orientation * other.position,
            self.orientation * other.orientation,
        )
    }

    /// Forward direction (-Z), matching camera convention.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

/// One eye/camera of one tracked frame.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Camera pose in the reference space the viewer pose was requested in.
    pub transform: Pose,
    pub projection_matrix: Mat4,
}

/// Viewer pose with the views rendered for it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerPose {
    pub transform: Pose,
    pub views: Vec<View>,
}

/// Pixel rectangle of the drawing surface used by one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }
}

/// One ranked surface intersection. Its pose is derived on demand in the
/// caller's space, never cached.
pub trait HitTestResult {
    fn pose(&self, space: &ReferenceSpace) -> Option<Pose>;
}

/// Metric depth map for one view of one frame.
pub trait DepthInformation {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Depth in metres at normalised view coordinates (`u`, `v` in [0, 1],
    /// origin top-left).
    fn depth_in_meters(&self, u: f32, v: f32) -> f32;
}

/// Frame-scoped query handle, valid only while its callback runs.
pub trait TrackedFrame {
    fn request_id(&self) -> FrameRequestId;

    /// Runtime timestamp in milliseconds.
    fn time(&self) -> f64;

    /// `None` when tracking is lost for this frame.
    fn viewer_pose(&self, space: &ReferenceSpace) -> Option<ViewerPose>;

    /// Best candidate first. Empty when no surface is found.
    fn hit_test_results(&self, source: &HitTestSource) -> Vec<Box<dyn HitTestResult + '_>>;

    /// `None` when depth sensing is disabled or the sensor is warming up.
    fn depth_information(&self, view: &View) -> Option<Box<dyn DepthInformation + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_undoes_pose() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.7));
        let round = pose.compose(&pose.inverse());
        assert!(round.position.length() < 1e-5);
        assert!(round.orientation.angle_between(Quat::IDENTITY) < 1e-5);
    }

    #[test]
    fn matrix_round_trips_through_pose() {
        let pose = Pose::new(Vec3::new(-0.5, 1.6, 2.0), Quat::from_rotation_x(-0.3));
        let back = Pose::from_matrix(pose.matrix());
        assert!((back.position - pose.position).length() < 1e-5);
        assert!(back.orientation.angle_between(pose.orientation) < 1e-5);
    }
}
