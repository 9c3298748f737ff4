use crate::engine::session::{
    HitTestSource, NegotiatedDepth, ReferenceSpace, ReferenceSpaceType, SessionFeature,
    SessionMode, TrackedFrame, View, Viewport,
};
use crate::error::ArError;

/// Identifier of an armed per-frame callback.
pub type FrameRequestId = u64;

/// Identifier of an event listener registration.
pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Requesting,
    Active,
    Ended,
}

/// Listener kinds a session dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    Select,
    End,
}

/// Work delivered by the session's event loop.
pub enum SessionEvent {
    /// Callback for an outstanding frame request.
    Frame(Box<dyn TrackedFrame>),
    /// Select gesture, delivered only while a select subscription exists.
    Select,
    /// Session ended by the user or the system.
    End,
}

impl std::fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frame(frame) => f
                .debug_tuple("Frame")
                .field(&frame.request_id())
                .finish(),
            Self::Select => f.write_str("Select"),
            Self::End => f.write_str("End"),
        }
    }
}

/// Active tracking context. Owns every reference space and hit-test source
/// it issues; none of them may be used after `state()` reports `Ended`.
pub trait TrackingSession {
    fn state(&self) -> SessionState;
    fn mode(&self) -> SessionMode;
    fn enabled_features(&self) -> &[SessionFeature];

    /// Granted depth configuration, `None` when depth sensing is disabled.
    fn depth_configuration(&self) -> Option<NegotiatedDepth>;

    fn request_reference_space(
        &mut self,
        kind: ReferenceSpaceType,
    ) -> Result<ReferenceSpace, ArError>;
    fn request_hit_test_source(&mut self, space: &ReferenceSpace)
    -> Result<HitTestSource, ArError>;

    /// Arm a one-shot callback for the next tracked frame.
    fn request_animation_frame(&mut self) -> Result<FrameRequestId, ArError>;
    fn cancel_animation_frame(&mut self, id: FrameRequestId);

    fn subscribe(&mut self, kind: SessionEventKind) -> Result<SubscriptionId, ArError>;
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Drawing-surface rectangle for `view` (may change frame to frame).
    fn viewport(&self, view: &View) -> Viewport;

    /// Next event in delivery order, if any.
    fn poll_event(&mut self) -> Option<SessionEvent>;

    /// End the session. Idempotent.
    fn end(&mut self);

    fn is_feature_enabled(&self, feature: SessionFeature) -> bool {
        self.enabled_features().contains(&feature)
    }

    fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }
}
