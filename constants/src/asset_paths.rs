/// Config document loaded at startup, relative to the asset root.
pub const CONFIG_PATH: &str = "config/ar_config.json";

/// Reticle glTF scene (surface cursor).
pub const RETICLE_MODEL_PATH: &str = "models/reticle/reticle.gltf";

/// Placeable glTF scene cloned on every select gesture.
pub const PLACEABLE_MODEL_PATH: &str = "models/sunflower/sunflower.gltf";

/// Name of the shadow plane node kept level with the newest placement.
pub const SHADOW_NODE_NAME: &str = "shadowMesh";

pub const RETICLE_NODE_NAME: &str = "reticle";
pub const LIGHT_NODE_NAME: &str = "directionalLight";
pub const PLACED_NODE_PREFIX: &str = "placed";
