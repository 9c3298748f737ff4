use crate::engine::session::{
    HitTestSource, Pose, ReferenceSpace, ReferenceSpaceType, TrackedFrame, TrackingSession,
};
use crate::error::ArError;

/// Standing hit-test request anchored to the viewer.
///
/// Ranking belongs to the tracking runtime; only the first result is used.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceDetector {
    source: HitTestSource,
    space: ReferenceSpace,
}

impl SurfaceDetector {
    pub fn new(source: HitTestSource, space: ReferenceSpace) -> Self {
        Self { source, space }
    }

    /// Create the viewer-anchored source once, at session start. Hit poses
    /// are reported in `space`.
    pub fn create(
        session: &mut dyn TrackingSession,
        viewer: &ReferenceSpace,
        space: ReferenceSpace,
    ) -> Result<Self, ArError> {
        debug_assert_eq!(viewer.kind(), ReferenceSpaceType::Viewer);
        let source = session.request_hit_test_source(viewer)?;
        Ok(Self::new(source, space))
    }

    pub fn source(&self) -> HitTestSource {
        self.source
    }

    /// Pose of the best candidate this frame, re-derived in the detector's
    /// space.
    pub fn best_hit(&self, frame: &dyn TrackedFrame) -> Option<Pose> {
        frame
            .hit_test_results(&self.source)
            .first()
            .and_then(|result| result.pose(&self.space))
    }
}
