use bevy::prelude::*;

use super::ray::{ray_from, surface_hits};
use crate::engine::session::{
    DepthInformation, FrameRequestId, HitTestResult, HitTestSource, Pose, ReferenceSpace,
    TrackedFrame, View, ViewerPose,
};

/// Everything a simulated frame knows, captured when it was produced.
#[derive(Debug, Clone)]
pub struct SimulatedFrame {
    pub request_id: FrameRequestId,
    /// Milliseconds since the runtime started.
    pub time_ms: f64,
    pub local: ReferenceSpace,
    pub viewer: ReferenceSpace,
    pub hit_source: Option<HitTestSource>,
    /// Viewer pose in the local space, `None` while tracking is lost.
    pub viewer_pose: Option<Pose>,
    pub projection: Mat4,
    pub surfaces: Vec<f32>,
    /// Depth map resolution, `None` when no depth is available this frame.
    pub depth_resolution: Option<UVec2>,
}

impl SimulatedFrame {
    /// Express a local-space pose in `space`.
    fn relative_to(&self, space: &ReferenceSpace, pose: Pose) -> Option<Pose> {
        if *space == self.local {
            Some(pose)
        } else if *space == self.viewer {
            let viewer = self.viewer_pose?;
            Some(viewer.inverse().compose(&pose))
        } else {
            None
        }
    }

    fn primary_view(&self, transform: Pose) -> View {
        View {
            transform,
            projection_matrix: self.projection,
        }
    }
}

impl TrackedFrame for SimulatedFrame {
    fn request_id(&self) -> FrameRequestId {
        self.request_id
    }

    fn time(&self) -> f64 {
        self.time_ms
    }

    fn viewer_pose(&self, space: &ReferenceSpace) -> Option<ViewerPose> {
        let world = self.viewer_pose?;
        let transform = self.relative_to(space, world)?;
        Some(ViewerPose {
            transform,
            views: vec![self.primary_view(transform)],
        })
    }

    fn hit_test_results(&self, source: &HitTestSource) -> Vec<Box<dyn HitTestResult + '_>> {
        if self.hit_source != Some(*source) {
            return Vec::new();
        }
        let Some(viewer) = self.viewer_pose else {
            return Vec::new();
        };
        let Some(ray) = ray_from(viewer.position, viewer.forward()) else {
            return Vec::new();
        };

        surface_hits(&ray, &self.surfaces)
            .into_iter()
            .map(|(_, point)| {
                Box::new(SimulatedHit {
                    frame: self,
                    pose: Pose::from_position(point),
                }) as Box<dyn HitTestResult + '_>
            })
            .collect()
    }

    fn depth_information(&self, view: &View) -> Option<Box<dyn DepthInformation + '_>> {
        let resolution = self.depth_resolution?;
        let world = self.viewer_pose?;
        if view.projection_matrix != self.projection {
            return None;
        }
        Some(Box::new(SimulatedDepth {
            resolution,
            camera: world,
            inverse_projection: self.projection.inverse(),
            surfaces: &self.surfaces,
        }))
    }
}

/// A point on a horizontal surface, surface normal along +Y.
struct SimulatedHit<'f> {
    frame: &'f SimulatedFrame,
    pose: Pose,
}

impl HitTestResult for SimulatedHit<'_> {
    fn pose(&self, space: &ReferenceSpace) -> Option<Pose> {
        self.frame.relative_to(space, self.pose)
    }
}

/// Metric z-depth of the simulated surfaces, sampled at the map's texel
/// centres.
struct SimulatedDepth<'f> {
    resolution: UVec2,
    camera: Pose,
    inverse_projection: Mat4,
    surfaces: &'f [f32],
}

impl SimulatedDepth<'_> {
    fn texel_centre(coord: f32, texels: u32) -> f32 {
        let texels = texels.max(1) as f32;
        ((coord.clamp(0.0, 1.0) * texels).floor().min(texels - 1.0) + 0.5) / texels
    }
}

impl DepthInformation for SimulatedDepth<'_> {
    fn width(&self) -> u32 {
        self.resolution.x
    }

    fn height(&self) -> u32 {
        self.resolution.y
    }

    fn depth_in_meters(&self, u: f32, v: f32) -> f32 {
        let u = Self::texel_centre(u, self.resolution.x);
        let v = Self::texel_centre(v, self.resolution.y);

        // Top-left origin in, NDC out.
        let ndc = Vec3::new(u * 2.0 - 1.0, 1.0 - v * 2.0, -1.0);
        let camera_dir = self.inverse_projection.project_point3(ndc).normalize_or_zero();
        if camera_dir.z >= 0.0 {
            return 0.0;
        }

        let Some(ray) = ray_from(self.camera.position, self.camera.orientation * camera_dir)
        else {
            return 0.0;
        };
        match surface_hits(&ray, self.surfaces).first() {
            Some((t, _)) => t * -camera_dir.z,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::session::ReferenceSpaceType;

    fn frame(viewer_pose: Option<Pose>) -> SimulatedFrame {
        let local = ReferenceSpace::new(1, ReferenceSpaceType::Local);
        let viewer = ReferenceSpace::new(2, ReferenceSpaceType::Viewer);
        SimulatedFrame {
            request_id: 1,
            time_ms: 0.0,
            local,
            viewer,
            hit_source: Some(HitTestSource::new(1, viewer)),
            viewer_pose,
            projection: Mat4::perspective_rh_gl(1.0, 1.0, 0.1, 100.0),
            surfaces: vec![0.0],
            depth_resolution: Some(UVec2::new(16, 16)),
        }
    }

    fn looking_down() -> Pose {
        Pose::new(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
        )
    }

    #[test]
    fn hit_pose_depends_on_requested_space() {
        let frame = frame(Some(looking_down()));
        let source = frame.hit_source.unwrap();
        let results = frame.hit_test_results(&source);
        assert_eq!(results.len(), 1);

        let in_local = results[0].pose(&frame.local).unwrap();
        assert!((in_local.position - Vec3::ZERO).length() < 1e-4);

        let in_viewer = results[0].pose(&frame.viewer).unwrap();
        assert!((in_viewer.position - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-4);
    }

    #[test]
    fn lost_tracking_yields_nothing() {
        let frame = frame(None);
        let source = frame.hit_source.unwrap();
        assert!(frame.viewer_pose(&frame.local).is_none());
        assert!(frame.hit_test_results(&source).is_empty());
    }

    #[test]
    fn depth_at_centre_is_distance_to_floor() {
        let frame = frame(Some(looking_down()));
        let view = frame.viewer_pose(&frame.local).unwrap().views.remove(0);
        let depth = frame.depth_information(&view).unwrap();
        assert_eq!((depth.width(), depth.height()), (16, 16));
        assert!((depth.depth_in_meters(0.5, 0.5) - 2.0).abs() < 1e-3);
    }
}
