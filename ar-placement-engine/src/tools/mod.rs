//! Interactive tools driven by session input.
//!
//! ## Placement Tool
//!
//! The only tool: a reticle follows the best detected surface every
//! tracked frame, and the select gesture anchors a copy of the placeable
//! model where the reticle sits.
//!
//! ```text
//! Left click / touch (desktop) or runtime select
//!   └─> SimulatedControl::select()
//!       └─> SessionEvent::Select
//!           └─> ArSessionDriver::dispatch()
//!               └─> PlacementController::on_select()
//!
//! Escape
//!   └─> ArSessionDriver::end()
//! ```

/// Reticle, template models and the placement controller.
///
/// Select gestures clone the placeable at the reticle; the shadow plane
/// follows the newest placement's height.
pub mod placement;
