use bevy::prelude::*;

use crate::engine::camera::XrCamera;
use crate::engine::render::SceneRenderer;
use crate::engine::scene::{DepthCanvas, DepthVisualizer, SceneGraph};
use crate::engine::session::{FrameRequestId, TrackedFrame, TrackingSession};
use crate::engine::tracking::{DepthSampler, PoseSource, SurfaceDetector};
use crate::error::ArError;
use crate::tools::placement::PlacementController;

/// State the frame callback mutates, injected per call.
pub struct FrameTargets<'a> {
    pub scene: &'a mut SceneGraph,
    pub placement: &'a mut PlacementController,
    pub camera: &'a mut XrCamera,
    pub renderer: &'a mut dyn SceneRenderer,
    pub depth_canvas: &'a mut dyn DepthCanvas,
}

/// What one frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered { hit: bool, depth_painted: bool },
    /// Tracking lost: re-armed, nothing drawn.
    SkippedNoPose,
    /// Not the outstanding request; ignored.
    Stale,
    /// Session is over; nothing touched, nothing re-armed.
    SessionEnded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub rendered: u64,
    pub skipped_no_pose: u64,
    pub depth_painted: u64,
    pub depth_unavailable: u64,
    pub stale: u64,
}

pub struct FrameScheduler {
    pose_source: PoseSource,
    surface_detector: SurfaceDetector,
    depth_sampler: Option<DepthSampler>,
    depth_visualizer: DepthVisualizer,
    pending: Option<FrameRequestId>,
    stopped: bool,
    stats: FrameStats,
}

impl FrameScheduler {
    pub fn new(
        pose_source: PoseSource,
        surface_detector: SurfaceDetector,
        depth_sampler: Option<DepthSampler>,
        depth_visualizer: DepthVisualizer,
    ) -> Self {
        Self {
            pose_source,
            surface_detector,
            depth_sampler,
            depth_visualizer,
            pending: None,
            stopped: false,
            stats: FrameStats::default(),
        }
    }

    /// Arm the callback for the next tracked frame. Returns the existing
    /// request if one is already outstanding.
    pub fn start(&mut self, session: &mut dyn TrackingSession) -> Result<FrameRequestId, ArError> {
        if let Some(pending) = self.pending {
            return Ok(pending);
        }
        let id = session.request_animation_frame()?;
        self.pending = Some(id);
        self.stopped = false;
        Ok(id)
    }

    /// Frame callback. Re-arms before any other work; every later step is
    /// conditional on the data the frame provides.
    pub fn on_frame(
        &mut self,
        session: &mut dyn TrackingSession,
        frame: &dyn TrackedFrame,
        mut targets: FrameTargets<'_>,
    ) -> FrameOutcome {
        if self.stopped || !session.is_active() {
            self.pending = None;
            self.stopped = true;
            return FrameOutcome::SessionEnded;
        }

        if self.pending != Some(frame.request_id()) {
            debug!(
                "Ignoring frame {} at {:.1} ms: not the outstanding request",
                frame.request_id(),
                frame.time()
            );
            self.stats.stale += 1;
            return FrameOutcome::Stale;
        }

        self.pending = None;
        match session.request_animation_frame() {
            Ok(next) => self.pending = Some(next),
            Err(_) => {
                self.stopped = true;
                return FrameOutcome::SessionEnded;
            }
        }

        let Some(view) = self.pose_source.primary_view(frame) else {
            self.stats.skipped_no_pose += 1;
            return FrameOutcome::SkippedNoPose;
        };

        let mut depth_painted = false;
        if let Some(sampler) = &self.depth_sampler {
            match sampler.sample(frame, &view) {
                Some(depth) => {
                    self.depth_visualizer
                        .paint(depth.as_ref(), &mut *targets.depth_canvas);
                    self.stats.depth_painted += 1;
                    depth_painted = true;
                }
                None => self.stats.depth_unavailable += 1,
            }
        }

        let viewport = session.viewport(&view);
        targets.renderer.set_size(viewport.size());
        targets.camera.sync_from_view(&view, frame.request_id());

        let best_hit = self.surface_detector.best_hit(frame);
        let hit = best_hit.is_some();
        targets.placement.update_reticle(best_hit, targets.scene);

        targets.renderer.render(targets.scene, targets.camera);
        self.stats.rendered += 1;

        FrameOutcome::Rendered { hit, depth_painted }
    }

    /// Cancel the outstanding request and refuse further frames.
    pub fn stop(&mut self, session: &mut dyn TrackingSession) {
        if let Some(pending) = self.pending.take() {
            session.cancel_animation_frame(pending);
        }
        self.stopped = true;
    }

    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    pub fn is_running(&self) -> bool {
        !self.stopped && self.pending.is_some()
    }

    pub fn has_depth(&self) -> bool {
        self.depth_sampler.is_some()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}
