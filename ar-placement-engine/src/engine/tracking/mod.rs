//! Per-frame data sources pulled by the frame scheduler.
//!
//! Each source wraps one query of the tracked frame and turns its absence
//! into an `Option`: a missing pose, an empty hit list or a warming-up depth
//! sensor only ever skips the dependent step for the current frame.

/// Viewer pose lookup yielding the single view that drives the camera.
pub mod pose_source;

/// Standing viewer-anchored hit-test request, best result only.
pub mod surface_detector;

/// Optional depth-sensing subsystem, present only when negotiated.
pub mod depth_sampler;

pub use depth_sampler::DepthSampler;
pub use pose_source::PoseSource;
pub use surface_detector::SurfaceDetector;
