//! Built-in simulated tracking runtime.
//!
//! Stands in for a device runtime on desktop and in tests. The viewer
//! orbits the origin at eye height; hit tests and depth come from a set of
//! horizontal surfaces (the floor by default).
//!
//! ```text
//! SimulatedRuntime::request_session()
//!   ├─> SimulatedSession  (handed to the engine as Box<dyn TrackingSession>)
//!   └─> SimulatedControl  (kept by the host: tick, select, end, faults)
//!
//! SimulatedControl::tick(t)
//!   └─> one SimulatedFrame per outstanding request, queued for poll_event()
//! ```

/// Frame, hit and depth data captured at tick time.
pub mod frame;

/// Ray/horizontal-plane intersection.
pub mod ray;

/// Negotiator, session and control handle.
pub mod runtime;

pub use frame::SimulatedFrame;
pub use runtime::{SimulatedControl, SimulatedRuntime, SimulatedSession};
