use crate::engine::session::{ReferenceSpace, TrackedFrame, View};

/// Resolves the camera view of a tracked frame in a world-stable space.
#[derive(Debug, Clone, Copy)]
pub struct PoseSource {
    space: ReferenceSpace,
}

impl PoseSource {
    pub fn new(space: ReferenceSpace) -> Self {
        Self { space }
    }

    pub fn space(&self) -> ReferenceSpace {
        self.space
    }

    /// First view of the viewer pose, or `None` when tracking is lost.
    pub fn primary_view(&self, frame: &dyn TrackedFrame) -> Option<View> {
        let pose = frame.viewer_pose(&self.space)?;
        pose.views.into_iter().next()
    }
}
