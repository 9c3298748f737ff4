use bevy::prelude::*;

use crate::engine::session::{FrameRequestId, View};

/// Camera whose matrices are set from a tracked view, never auto-updated.
#[derive(Debug, Clone, PartialEq)]
pub struct XrCamera {
    /// Camera pose in the world (the view's transform matrix).
    pub matrix: Mat4,
    pub projection_matrix: Mat4,
    /// Frame whose view last drove this camera.
    pub synced_frame: Option<FrameRequestId>,
}

impl Default for XrCamera {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            synced_frame: None,
        }
    }
}

impl XrCamera {
    pub fn sync_from_view(&mut self, view: &View, frame: FrameRequestId) {
        self.matrix = view.transform.matrix();
        self.projection_matrix = view.projection_matrix;
        self.synced_frame = Some(frame);
    }

    pub fn transform(&self) -> Transform {
        Transform::from_matrix(self.matrix)
    }

    /// Vertical field of view (radians) recovered from the projection.
    pub fn fov_y(&self) -> f32 {
        let focal = self.projection_matrix.y_axis.y;
        if focal.abs() <= f32::EPSILON {
            return std::f32::consts::FRAC_PI_2;
        }
        2.0 * (1.0 / focal).atan()
    }

    /// Width over height recovered from the projection.
    pub fn aspect_ratio(&self) -> f32 {
        let sx = self.projection_matrix.x_axis.x;
        if sx.abs() <= f32::EPSILON {
            return 1.0;
        }
        self.projection_matrix.y_axis.y / sx
    }

    /// Near and far distances of a GL-style perspective projection.
    pub fn clip_planes(&self) -> (f32, f32) {
        let c = self.projection_matrix.z_axis.z;
        let d = self.projection_matrix.w_axis.z;
        if (c - 1.0).abs() <= f32::EPSILON || (c + 1.0).abs() <= f32::EPSILON {
            return (0.1, 1000.0);
        }
        (d / (c - 1.0), d / (c + 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::session::Pose;

    #[test]
    fn sync_copies_view_matrices() {
        let projection = Mat4::perspective_rh_gl(0.9, 16.0 / 9.0, 0.1, 100.0);
        let view = View {
            transform: Pose::new(Vec3::new(0.0, 1.6, 2.0), Quat::from_rotation_x(-0.4)),
            projection_matrix: projection,
        };

        let mut camera = XrCamera::default();
        camera.sync_from_view(&view, 7);

        assert_eq!(camera.matrix, view.transform.matrix());
        assert_eq!(camera.projection_matrix, projection);
        assert_eq!(camera.synced_frame, Some(7));
        assert!((camera.fov_y() - 0.9).abs() < 1e-4);
        assert!((camera.aspect_ratio() - 16.0 / 9.0).abs() < 1e-4);

        let (near, far) = camera.clip_planes();
        assert!((near - 0.1).abs() < 1e-4);
        assert!((far - 100.0).abs() < 0.5);
    }
}
