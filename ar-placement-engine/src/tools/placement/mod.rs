//! Surface placement tool.
//!
//! Owns the reticle (surface cursor) and the objects anchored with the
//! select gesture.
//!
//! ## Flow
//!
//! ```text
//! Frame loop (once per tracked frame)
//!   └─> SurfaceDetector::best_hit()
//!       └─> PlacementController::update_reticle()
//!           ├─> hit:    reticle visible, pose overwritten
//!           └─> no hit: reticle left where it was
//!
//! Select gesture (asynchronous, any time)
//!   └─> PlacementController::on_select()
//!       ├─> placeable not loaded → no-op
//!       ├─> no reticle pose yet  → no-op
//!       └─> clone placeable at reticle position
//!           └─> shadow plane (if present) moved to the same height
//! ```
//!
//! Both template models load out of band. Until they arrive every
//! operation above is a silent no-op.

/// Select gesture bindings (mouse, touch).
pub mod interactions;

/// Placement controller and select outcomes.
pub mod placement;

/// Reticle state.
pub mod state;

pub use placement::{PlacementController, SelectOutcome};
pub use state::Reticle;
