//! Tracking session contracts consumed by the engine core.
//!
//! The tracking runtime (a device runtime, or the built-in simulation) is an
//! external collaborator. The core only sees the traits defined here:
//!
//! ```text
//! SessionNegotiator::request_session(mode, init)
//!   └─> Box<dyn TrackingSession>
//!         ├─> request_reference_space(local | viewer)
//!         ├─> request_hit_test_source(viewer)
//!         ├─> request_animation_frame() ──> FrameRequestId
//!         ├─> subscribe(Select)         ──> SubscriptionId
//!         └─> poll_event()
//!               ├─> SessionEvent::Frame(Box<dyn TrackedFrame>)
//!               ├─> SessionEvent::Select
//!               └─> SessionEvent::End
//! ```
//!
//! Frame handles are owned boxes dropped after dispatch, and everything
//! borrowed from a frame (hit results, depth information) carries the
//! frame's lifetime, so nothing frame-scoped can outlive its callback.

/// Poses, views, viewports and the per-frame query traits.
pub mod frame;

/// Session modes, features, depth preferences and the negotiator trait.
pub mod negotiation;

/// Reference spaces and hit-test source handles.
pub mod spaces;

/// Explicit event subscriptions with unsubscribe-on-teardown.
pub mod subscription;

/// The active tracking session contract and its event stream.
pub mod tracking_session;

pub use frame::{
    DepthInformation, HitTestResult, Pose, TrackedFrame, View, ViewerPose, Viewport,
};
pub use negotiation::{
    DepthDataFormat, DepthSensingInit, DepthUsage, NegotiatedDepth, SessionFeature, SessionInit,
    SessionMode, SessionNegotiator,
};
pub use spaces::{HitTestSource, ReferenceSpace, ReferenceSpaceType};
pub use subscription::Subscription;
pub use tracking_session::{
    FrameRequestId, SessionEvent, SessionEventKind, SessionState, SubscriptionId, TrackingSession,
};
