/// Asset and scene-node naming shared by the engine and its config defaults.
pub mod asset_paths;

/// Depth overlay, lighting and shadow plane tunables.
pub mod render_settings;

/// Defaults for the built-in simulated tracking runtime.
pub mod simulation;
