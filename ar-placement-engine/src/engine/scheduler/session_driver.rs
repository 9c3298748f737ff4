use bevy::prelude::*;
use constants::asset_paths::LIGHT_NODE_NAME;

use super::frame_scheduler::{FrameOutcome, FrameScheduler, FrameStats, FrameTargets};
use crate::config::{ArConfig, SceneConfig};
// Crate engine modules
use crate::engine::camera::XrCamera;
use crate::engine::render::SceneRenderer;
use crate::engine::scene::{
    DepthCanvas, DepthVisualizer, ModelTemplate, NodeContent, SceneGraph, SceneNode,
};
use crate::engine::session::{
    ReferenceSpaceType, SessionEvent, SessionEventKind, SessionNegotiator, SessionState,
    Subscription, TrackingSession,
};
use crate::engine::tracking::{DepthSampler, PoseSource, SurfaceDetector};
use crate::error::ArError;
// Crate tools modules
use crate::tools::placement::{PlacementController, SelectOutcome};

/// What handling one session event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverEvent {
    Frame(FrameOutcome),
    Select(SelectOutcome),
    /// Select arrived after teardown.
    SelectIgnored,
    Ended,
}

/// Owns one tracking session and everything derived from it.
///
/// All mutable state the frame callback and the select handler share lives
/// here and is handed to them explicitly, so the event loop is the only
/// place that sequences them.
pub struct ArSessionDriver<R: SceneRenderer, C: DepthCanvas> {
    session: Box<dyn TrackingSession>,
    scheduler: FrameScheduler,
    scene: SceneGraph,
    placement: PlacementController,
    camera: XrCamera,
    renderer: R,
    depth_canvas: C,
    select_listener: Subscription,
    end_listener: Subscription,
    torn_down: bool,
}

impl<R: SceneRenderer, C: DepthCanvas> ArSessionDriver<R, C> {
    /// Negotiate a session and arm the first frame.
    pub fn start(
        negotiator: &mut dyn SessionNegotiator,
        config: &ArConfig,
        renderer: R,
        depth_canvas: C,
    ) -> Result<Self, ArError> {
        config.validate()?;

        let mut session = negotiator.request_session(&config.session)?;
        let armed = arm_session(session.as_mut(), config);
        let (scheduler, select_listener, end_listener) = match armed {
            Ok(parts) => parts,
            Err(err) => {
                warn!("AR session set-up failed, ending it: {err}");
                session.end();
                return Err(err);
            }
        };

        let mut scene = SceneGraph::new();
        populate_scene(&mut scene, &config.scene);

        info!(
            "AR session started ({}): features {:?}",
            session.mode(),
            session.enabled_features()
        );

        Ok(Self {
            session,
            scheduler,
            scene,
            placement: PlacementController::new(config.scene.shadow_node_name.clone()),
            camera: XrCamera::default(),
            renderer,
            depth_canvas,
            select_listener,
            end_listener,
            torn_down: false,
        })
    }

    /// Drain and handle every event the session has queued.
    pub fn pump(&mut self) -> Vec<DriverEvent> {
        let mut handled = Vec::new();
        while let Some(event) = self.session.poll_event() {
            handled.push(self.dispatch(event));
        }
        handled
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> DriverEvent {
        match event {
            SessionEvent::Frame(frame) => {
                if self.torn_down {
                    return DriverEvent::Frame(FrameOutcome::SessionEnded);
                }
                let targets = FrameTargets {
                    scene: &mut self.scene,
                    placement: &mut self.placement,
                    camera: &mut self.camera,
                    renderer: &mut self.renderer,
                    depth_canvas: &mut self.depth_canvas,
                };
                let outcome = self
                    .scheduler
                    .on_frame(self.session.as_mut(), frame.as_ref(), targets);
                if outcome == FrameOutcome::SessionEnded {
                    self.teardown();
                }
                DriverEvent::Frame(outcome)
            }
            SessionEvent::Select => {
                if self.torn_down || !self.select_listener.is_active() {
                    return DriverEvent::SelectIgnored;
                }
                DriverEvent::Select(self.placement.on_select(&mut self.scene))
            }
            SessionEvent::End => {
                self.teardown();
                DriverEvent::Ended
            }
        }
    }

    /// User-initiated end of AR.
    pub fn end(&mut self) {
        self.teardown();
    }

    /// Reticle model finished loading. Ignored after teardown.
    pub fn on_reticle_loaded(&mut self, template: ModelTemplate) -> bool {
        if self.torn_down {
            debug!("Reticle model {} arrived after session end", template.uri);
            return false;
        }
        self.placement.install_reticle(&template, &mut self.scene);
        info!("Reticle model ready: {}", template.uri);
        true
    }

    /// Placeable model finished loading. Ignored after teardown.
    pub fn on_placeable_loaded(&mut self, template: ModelTemplate) -> bool {
        if self.torn_down {
            debug!("Placeable model {} arrived after session end", template.uri);
            return false;
        }
        info!("Placeable model ready: {}", template.uri);
        self.placement.install_placeable(template);
        true
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.scheduler.stop(self.session.as_mut());
        self.select_listener.unsubscribe(self.session.as_mut());
        self.end_listener.unsubscribe(self.session.as_mut());
        self.session.end();

        self.scene.clear();
        self.placement.reset();

        let stats = self.scheduler.stats();
        info!(
            "AR session ended: {} frames rendered, {} without pose, {} depth maps painted",
            stats.rendered, stats.skipped_no_pose, stats.depth_painted
        );
    }

    pub fn is_active(&self) -> bool {
        !self.torn_down && self.session.is_active()
    }

    pub fn session_state(&self) -> SessionState {
        if self.torn_down {
            SessionState::Ended
        } else {
            self.session.state()
        }
    }

    pub fn session(&self) -> &dyn TrackingSession {
        self.session.as_ref()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> FrameStats {
        self.scheduler.stats()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    pub fn camera(&self) -> &XrCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn depth_canvas(&self) -> &C {
        &self.depth_canvas
    }

    pub fn depth_canvas_mut(&mut self) -> &mut C {
        &mut self.depth_canvas
    }
}


/// Spaces, detector, sampler, listeners and the first frame request of a
/// freshly negotiated session.
fn arm_session(
    session: &mut dyn TrackingSession,
    config: &ArConfig,
) -> Result<(FrameScheduler, Subscription, Subscription), ArError> {
    let local = session.request_reference_space(ReferenceSpaceType::Local)?;
    let viewer = session.request_reference_space(ReferenceSpaceType::Viewer)?;
    let surface_detector = SurfaceDetector::create(session, &viewer, local)?;
    let depth_sampler = if config.depth_overlay.enabled {
        DepthSampler::for_session(session)
    } else {
        None
    };

    let select_listener = Subscription::register(session, SessionEventKind::Select)?;
    let end_listener = Subscription::register(session, SessionEventKind::End)?;

    let mut scheduler = FrameScheduler::new(
        PoseSource::new(local),
        surface_detector,
        depth_sampler,
        DepthVisualizer::new(config.depth_overlay.stride, config.depth_overlay.alpha),
    );
    scheduler.start(session)?;

    Ok((scheduler, select_listener, end_listener))
}

/// Lighting and the shadow catcher every session starts with.
fn populate_scene(scene: &mut SceneGraph, config: &SceneConfig) {
    let mut light = SceneNode::new(
        LIGHT_NODE_NAME,
        NodeContent::DirectionalLight {
            intensity: config.light_intensity,
        },
    );
    light.transform =
        Transform::from_xyz(0.0, config.light_height, 0.0).looking_at(Vec3::ZERO, Vec3::Z);
    scene.add(light);

    if config.shadow_plane {
        scene.add(SceneNode::new(
            config.shadow_node_name.clone(),
            NodeContent::ShadowPlane {
                size: config.shadow_plane_size,
            },
        ));
    }
}
