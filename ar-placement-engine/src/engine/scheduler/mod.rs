//! Per-frame control loop and session lifecycle.
//!
//! ## Frame protocol
//!
//! ```text
//! start() ── request_animation_frame() ──> pending = #1
//!
//! Frame #1 delivered
//!   ├─ session ended?         → return, touch nothing
//!   ├─ frame id != pending?   → stale, ignore
//!   ├─ re-arm                 → pending = #2   (always, before any work)
//!   ├─ no viewer pose?        → skip render this frame
//!   ├─ depth available?       → paint depth grid
//!   ├─ renderer.set_size(viewport of view 0)
//!   ├─ camera ← view 0 transform + projection
//!   ├─ reticle ← best hit (if any)
//!   └─ renderer.render(scene, camera)
//! ```
//!
//! Exactly one request is outstanding at any time, so frames are neither
//! duplicated nor reordered, and a slow frame never loses the next one.

/// The frame scheduler: re-arm, pull data sources, render.
pub mod frame_scheduler;

/// Session owner wiring the scheduler, placement tool and event stream.
pub mod session_driver;

pub use frame_scheduler::{FrameOutcome, FrameScheduler, FrameStats, FrameTargets};
pub use session_driver::{ArSessionDriver, DriverEvent};
