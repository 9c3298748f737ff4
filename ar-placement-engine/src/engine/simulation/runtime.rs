use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bevy::prelude::*;
use constants::simulation::{FAR_PLANE, NEAR_PLANE};

use super::frame::SimulatedFrame;
use crate::config::SimulationConfig;
use crate::engine::session::{
    FrameRequestId, HitTestSource, NegotiatedDepth, Pose, ReferenceSpace, ReferenceSpaceType,
    SessionEvent, SessionEventKind, SessionFeature, SessionInit, SessionMode, SessionNegotiator,
    SessionState, SubscriptionId, TrackingSession, View, Viewport,
};
use crate::error::ArError;

/// Deterministic stand-in for a device tracking runtime.
///
/// Frames are produced only by [`SimulatedControl::tick`] and only for
/// requests that are outstanding at that moment.
pub struct SimulatedRuntime {
    config: SimulationConfig,
    control: Option<SimulatedControl>,
}

impl SimulatedRuntime {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            control: None,
        }
    }

    /// Control handle of the most recently created session.
    pub fn control(&self) -> Option<SimulatedControl> {
        self.control.clone()
    }

    fn negotiate(&self, init: &SessionInit) -> Result<SimState, ArError> {
        init.validate()?;

        if init.mode != SessionMode::ImmersiveAr {
            return Err(ArError::UnsupportedMode(init.mode));
        }

        let supported = &self.config.supported_features;
        if let Some(missing) = init
            .required_features
            .iter()
            .find(|feature| !supported.contains(feature))
        {
            return Err(ArError::UnsupportedFeature(*missing));
        }

        let mut features: Vec<SessionFeature> = Vec::new();
        let implicit = [SessionFeature::Local, SessionFeature::Viewer];
        for feature in init
            .required_features
            .iter()
            .chain(init.optional_features.iter())
            .chain(implicit.iter())
        {
            if supported.contains(feature) && !features.contains(feature) {
                features.push(*feature);
            }
        }

        let mut depth = None;
        if features.contains(&SessionFeature::DepthSensing) {
            depth = init.depth_sensing.as_ref().and_then(|prefs| {
                prefs.resolve(&self.config.depth_usage, &self.config.depth_formats)
            });
            if depth.is_none() {
                if init.requires(SessionFeature::DepthSensing) {
                    return Err(ArError::DepthConfigurationUnsatisfiable);
                }
                debug!("Depth preferences not satisfiable, continuing without depth sensing");
                features.retain(|f| *f != SessionFeature::DepthSensing);
            }
        }

        Ok(SimState::new(self.config.clone(), init.mode, features, depth))
    }
}

impl SessionNegotiator for SimulatedRuntime {
    fn request_session(&mut self, init: &SessionInit) -> Result<Box<dyn TrackingSession>, ArError> {
        let state = match self.negotiate(init) {
            Ok(state) => state,
            Err(err) => {
                warn!("Simulated runtime rejected session request: {err}");
                return Err(err);
            }
        };

        let features = state.features.clone();
        let shared = Rc::new(RefCell::new(state));
        self.control = Some(SimulatedControl {
            shared: Rc::clone(&shared),
        });
        Ok(Box::new(SimulatedSession { shared, features }))
    }
}

enum QueuedEvent {
    Frame(SimulatedFrame),
    Select,
    End,
}

struct SimState {
    config: SimulationConfig,
    mode: SessionMode,
    state: SessionState,
    features: Vec<SessionFeature>,
    depth: Option<NegotiatedDepth>,
    spaces: Vec<ReferenceSpace>,
    hit_sources: Vec<HitTestSource>,
    next_id: u32,
    next_request: FrameRequestId,
    pending: Vec<FrameRequestId>,
    next_subscription: SubscriptionId,
    subscriptions: Vec<(SubscriptionId, SessionEventKind)>,
    queue: VecDeque<QueuedEvent>,
    viewport: Viewport,
    ticks: u64,
    frames_delivered: u64,
    lost_frames: u32,
    depth_warmup: u32,
}

impl SimState {
    fn new(
        config: SimulationConfig,
        mode: SessionMode,
        features: Vec<SessionFeature>,
        depth: Option<NegotiatedDepth>,
    ) -> Self {
        let [width, height] = config.viewport;
        let depth_warmup = config.depth_warmup_frames;
        Self {
            config,
            mode,
            state: SessionState::Active,
            features,
            depth,
            spaces: Vec::new(),
            hit_sources: Vec::new(),
            next_id: 1,
            next_request: 1,
            pending: Vec::new(),
            next_subscription: 1,
            subscriptions: Vec::new(),
            queue: VecDeque::new(),
            viewport: Viewport::new(width, height),
            ticks: 0,
            frames_delivered: 0,
            lost_frames: 0,
            depth_warmup,
        }
    }

    fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    fn ensure_active(&self) -> Result<(), ArError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ArError::SessionEnded)
        }
    }

    fn has_listener(&self, kind: SessionEventKind) -> bool {
        self.subscriptions.iter().any(|(_, k)| *k == kind)
    }

    fn space(&self, kind: ReferenceSpaceType) -> Option<ReferenceSpace> {
        self.spaces.iter().copied().find(|s| s.kind() == kind)
    }

    /// Viewer orbiting the origin at eye height, looking slightly down.
    fn orbit_pose(&self, time_s: f64) -> Pose {
        let sim = &self.config;
        let angle = (time_s as f32) * sim.orbit_speed;
        let eye = Vec3::new(
            sim.orbit_radius * angle.sin(),
            sim.eye_height,
            sim.orbit_radius * angle.cos(),
        );
        let target = Vec3::new(0.0, sim.eye_height - sim.look_down, 0.0);
        let transform = Transform::from_translation(eye).looking_at(target, Vec3::Y);
        Pose::new(transform.translation, transform.rotation)
    }

    fn tracking_lost(&mut self) -> bool {
        if self.lost_frames > 0 {
            self.lost_frames -= 1;
            return true;
        }
        match self.config.tracking_loss {
            Some(loss) if loss.every_frames > 0 => {
                (self.ticks % loss.every_frames as u64) < loss.duration_frames as u64
                    && self.ticks >= loss.every_frames as u64
            }
            _ => false,
        }
    }

    fn depth_ready(&mut self) -> bool {
        if self.depth.is_none() {
            return false;
        }
        if self.depth_warmup > 0 {
            self.depth_warmup -= 1;
            return false;
        }
        true
    }

    fn tick(&mut self, time_s: f64) -> usize {
        if !self.is_active() || self.pending.is_empty() {
            return 0;
        }
        self.ticks += 1;

        let (Some(local), Some(viewer)) = (
            self.space(ReferenceSpaceType::Local),
            self.space(ReferenceSpaceType::Viewer),
        ) else {
            return 0;
        };

        let viewer_pose = (!self.tracking_lost()).then(|| self.orbit_pose(time_s));
        let depth_resolution = (viewer_pose.is_some() && self.depth_ready())
            .then(|| UVec2::from_array(self.config.depth_resolution));

        let aspect = self.viewport.width.max(1) as f32 / self.viewport.height.max(1) as f32;
        let projection =
            Mat4::perspective_rh_gl(self.config.field_of_view_y, aspect, NEAR_PLANE, FAR_PLANE);

        let requests = std::mem::take(&mut self.pending);
        for request_id in &requests {
            self.queue.push_back(QueuedEvent::Frame(SimulatedFrame {
                request_id: *request_id,
                time_ms: time_s * 1000.0,
                local,
                viewer,
                hit_source: self.hit_sources.first().copied(),
                viewer_pose,
                projection,
                surfaces: self.config.surfaces.clone(),
                depth_resolution,
            }));
        }
        self.frames_delivered += requests.len() as u64;
        requests.len()
    }

    fn end(&mut self) {
        if !self.is_active() {
            return;
        }
        self.state = SessionState::Ended;
        self.pending.clear();
        if self.has_listener(SessionEventKind::End) {
            self.queue.push_back(QueuedEvent::End);
        }
        info!("Simulated session ended after {} frames", self.frames_delivered);
    }
}

/// Session half handed to the engine.
pub struct SimulatedSession {
    shared: Rc<RefCell<SimState>>,
    /// Fixed at negotiation.
    features: Vec<SessionFeature>,
}

impl TrackingSession for SimulatedSession {
    fn state(&self) -> SessionState {
        self.shared.borrow().state
    }

    fn mode(&self) -> SessionMode {
        self.shared.borrow().mode
    }

    fn enabled_features(&self) -> &[SessionFeature] {
        &self.features
    }

    fn depth_configuration(&self) -> Option<NegotiatedDepth> {
        self.shared.borrow().depth
    }

    fn request_reference_space(
        &mut self,
        kind: ReferenceSpaceType,
    ) -> Result<ReferenceSpace, ArError> {
        let mut sim = self.shared.borrow_mut();
        sim.ensure_active()?;

        let feature = match kind {
            ReferenceSpaceType::Local => SessionFeature::Local,
            ReferenceSpaceType::Viewer => SessionFeature::Viewer,
        };
        if !sim.features.contains(&feature) {
            return Err(ArError::ReferenceSpaceUnavailable(kind));
        }
        if let Some(existing) = sim.space(kind) {
            return Ok(existing);
        }

        let space = ReferenceSpace::new(sim.next_id, kind);
        sim.next_id += 1;
        sim.spaces.push(space);
        Ok(space)
    }

    fn request_hit_test_source(
        &mut self,
        space: &ReferenceSpace,
    ) -> Result<HitTestSource, ArError> {
        let mut sim = self.shared.borrow_mut();
        sim.ensure_active()?;

        if !sim.features.contains(&SessionFeature::HitTest) {
            return Err(ArError::UnsupportedFeature(SessionFeature::HitTest));
        }
        if !sim.spaces.contains(space) {
            return Err(ArError::ReferenceSpaceUnavailable(space.kind()));
        }

        let source = HitTestSource::new(sim.next_id, *space);
        sim.next_id += 1;
        sim.hit_sources.push(source);
        Ok(source)
    }

    fn request_animation_frame(&mut self) -> Result<FrameRequestId, ArError> {
        let mut sim = self.shared.borrow_mut();
        sim.ensure_active()?;

        let id = sim.next_request;
        sim.next_request += 1;
        sim.pending.push(id);
        Ok(id)
    }

    fn cancel_animation_frame(&mut self, id: FrameRequestId) {
        self.shared.borrow_mut().pending.retain(|pending| *pending != id);
    }

    fn subscribe(&mut self, kind: SessionEventKind) -> Result<SubscriptionId, ArError> {
        let mut sim = self.shared.borrow_mut();
        sim.ensure_active()?;

        let id = sim.next_subscription;
        sim.next_subscription += 1;
        sim.subscriptions.push((id, kind));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.shared
            .borrow_mut()
            .subscriptions
            .retain(|(existing, _)| *existing != id);
    }

    fn viewport(&self, _view: &View) -> Viewport {
        self.shared.borrow().viewport
    }

    fn poll_event(&mut self) -> Option<SessionEvent> {
        let event = self.shared.borrow_mut().queue.pop_front()?;
        Some(match event {
            QueuedEvent::Frame(frame) => SessionEvent::Frame(Box::new(frame)),
            QueuedEvent::Select => SessionEvent::Select,
            QueuedEvent::End => SessionEvent::End,
        })
    }

    fn end(&mut self) {
        self.shared.borrow_mut().end();
    }
}

/// Script handle for driving a simulated session from systems and tests.
#[derive(Clone)]
pub struct SimulatedControl {
    shared: Rc<RefCell<SimState>>,
}

impl SimulatedControl {
    /// Advance the runtime clock, producing one frame per outstanding
    /// request. Returns the number of frames produced.
    pub fn tick(&self, time_s: f64) -> usize {
        self.shared.borrow_mut().tick(time_s)
    }

    /// Inject a select gesture. Dropped unless a select listener exists.
    pub fn select(&self) -> bool {
        let mut sim = self.shared.borrow_mut();
        if !sim.is_active() || !sim.has_listener(SessionEventKind::Select) {
            return false;
        }
        sim.queue.push_back(QueuedEvent::Select);
        true
    }

    /// End the session from the runtime side, as a user or system would.
    pub fn end(&self) {
        self.shared.borrow_mut().end();
    }

    /// Report no viewer pose for the next `frames` frames.
    pub fn lose_tracking(&self, frames: u32) {
        self.shared.borrow_mut().lost_frames = frames;
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.shared.borrow_mut().viewport = Viewport::new(width, height);
    }

    /// Withhold depth data for the next `frames` frames.
    pub fn set_depth_warmup(&self, frames: u32) {
        self.shared.borrow_mut().depth_warmup = frames;
    }

    pub fn set_surfaces(&self, surfaces: Vec<f32>) {
        self.shared.borrow_mut().config.surfaces = surfaces;
    }

    pub fn pending_requests(&self) -> usize {
        self.shared.borrow().pending.len()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.shared.borrow().frames_delivered
    }

    pub fn listener_count(&self, kind: SessionEventKind) -> usize {
        self.shared
            .borrow()
            .subscriptions
            .iter()
            .filter(|(_, k)| *k == kind)
            .count()
    }

    pub fn state(&self) -> SessionState {
        self.shared.borrow().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::session::{DepthDataFormat, DepthSensingInit, DepthUsage};

    fn runtime() -> SimulatedRuntime {
        SimulatedRuntime::new(SimulationConfig::default())
    }

    fn started(runtime: &mut SimulatedRuntime) -> Box<dyn TrackingSession> {
        let mut session = runtime.request_session(&SessionInit::default()).unwrap();
        session
            .request_reference_space(ReferenceSpaceType::Local)
            .unwrap();
        session
            .request_reference_space(ReferenceSpaceType::Viewer)
            .unwrap();
        session
    }

    #[test]
    fn rejects_unsupported_mode_and_features() {
        let mut runtime = runtime();
        let vr = SessionInit {
            mode: SessionMode::ImmersiveVr,
            ..SessionInit::default()
        };
        assert_eq!(
            runtime.request_session(&vr).err(),
            Some(ArError::UnsupportedMode(SessionMode::ImmersiveVr))
        );

        let mut no_hit_test = SimulationConfig::default();
        no_hit_test.supported_features = vec![SessionFeature::Local, SessionFeature::Viewer];
        let err = SimulatedRuntime::new(no_hit_test)
            .request_session(&SessionInit::default())
            .err();
        assert_eq!(err, Some(ArError::UnsupportedFeature(SessionFeature::HitTest)));
    }

    #[test]
    fn optional_depth_is_dropped_when_unsatisfiable() {
        let mut config = SimulationConfig::default();
        config.depth_formats = vec![DepthDataFormat::Float32];
        let mut runtime = SimulatedRuntime::new(config);

        let init = SessionInit {
            depth_sensing: Some(DepthSensingInit {
                usage_preference: vec![DepthUsage::CpuOptimized],
                format_preference: vec![DepthDataFormat::LuminanceAlpha],
            }),
            ..SessionInit::default()
        };
        let session = runtime.request_session(&init).unwrap();
        assert!(!session.is_feature_enabled(SessionFeature::DepthSensing));
        assert_eq!(session.depth_configuration(), None);

        let required = SessionInit {
            required_features: vec![SessionFeature::HitTest, SessionFeature::DepthSensing],
            ..init
        };
        assert_eq!(
            runtime.request_session(&required).err(),
            Some(ArError::DepthConfigurationUnsatisfiable)
        );
    }

    #[test]
    fn frames_only_for_outstanding_requests() {
        let mut runtime = runtime();
        let mut session = started(&mut runtime);
        let control = runtime.control().unwrap();

        assert_eq!(control.tick(0.0), 0);
        let id = session.request_animation_frame().unwrap();
        assert_eq!(control.tick(0.016), 1);
        assert_eq!(control.tick(0.032), 0);

        match session.poll_event() {
            Some(SessionEvent::Frame(frame)) => assert_eq!(frame.request_id(), id),
            other => panic!("expected a frame, got {other:?}"),
        }
        assert!(session.poll_event().is_none());
    }

    #[test]
    fn cancelled_request_is_never_delivered() {
        let mut runtime = runtime();
        let mut session = started(&mut runtime);
        let control = runtime.control().unwrap();

        let id = session.request_animation_frame().unwrap();
        session.cancel_animation_frame(id);
        assert_eq!(control.tick(0.0), 0);
    }

    #[test]
    fn select_requires_a_listener() {
        let mut runtime = runtime();
        let mut session = started(&mut runtime);
        let control = runtime.control().unwrap();

        assert!(!control.select());
        let id = session.subscribe(SessionEventKind::Select).unwrap();
        assert!(control.select());
        session.unsubscribe(id);
        assert!(!control.select());
    }

    #[test]
    fn ended_session_refuses_new_work() {
        let mut runtime = runtime();
        let mut session = started(&mut runtime);
        let control = runtime.control().unwrap();
        session.subscribe(SessionEventKind::End).unwrap();
        session.request_animation_frame().unwrap();

        control.end();
        assert_eq!(control.state(), SessionState::Ended);
        assert_eq!(control.pending_requests(), 0);
        assert!(matches!(session.poll_event(), Some(SessionEvent::End)));
        assert_eq!(
            session.request_animation_frame(),
            Err(ArError::SessionEnded)
        );
        assert_eq!(control.tick(1.0), 0);
    }

    #[test]
    fn lost_tracking_and_depth_warmup() {
        let mut runtime = runtime();
        let mut session = started(&mut runtime);
        let control = runtime.control().unwrap();
        let local = session
            .request_reference_space(ReferenceSpaceType::Local)
            .unwrap();

        control.lose_tracking(1);
        control.set_depth_warmup(1);

        let mut frames = Vec::new();
        for n in 0..3 {
            session.request_animation_frame().unwrap();
            control.tick(n as f64 * 0.016);
            if let Some(SessionEvent::Frame(frame)) = session.poll_event() {
                frames.push(frame);
            }
        }

        assert!(frames[0].viewer_pose(&local).is_none());
        let view = frames[1].viewer_pose(&local).unwrap().views.remove(0);
        assert!(frames[1].depth_information(&view).is_none());
        let view = frames[2].viewer_pose(&local).unwrap().views.remove(0);
        assert!(frames[2].depth_information(&view).is_some());
    }
}
