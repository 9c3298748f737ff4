//! Per-frame app systems around the session driver.
//!
//! Advances the tracking runtime, pumps session events through the driver
//! and keeps the status overlay current.

/// Tracking runtime clock and session event pump.
///
/// Moves the app to `Ended` once the driver reports the session is over.
pub mod session_pump;

/// On-screen status line: FPS, frame counters, placements.
pub mod status_hud;
