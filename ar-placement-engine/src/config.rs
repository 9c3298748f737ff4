//! Runtime configuration, loaded from `config/ar_config.json`.
//!
//! Every section and field is optional; missing values fall back to the
//! tunables in the `constants` crate.

use bevy::prelude::*;
use constants::asset_paths::{PLACEABLE_MODEL_PATH, RETICLE_MODEL_PATH, SHADOW_NODE_NAME};
use constants::render_settings::{
    DEPTH_GRID_STRIDE, DEPTH_OVERLAY_ALPHA, LIGHT_HEIGHT, LIGHT_INTENSITY, SHADOW_PLANE_SIZE,
};
use constants::simulation::{
    DEPTH_HEIGHT, DEPTH_WIDTH, EYE_HEIGHT, FIELD_OF_VIEW_Y, FLOOR_HEIGHT, LOOK_DOWN,
    ORBIT_RADIUS, ORBIT_SPEED, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use serde::{Deserialize, Serialize};

use crate::engine::session::{DepthDataFormat, DepthUsage, SessionFeature, SessionInit};
use crate::error::ArError;

#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ArConfig {
    pub session: SessionInit,
    pub assets: AssetConfig,
    pub depth_overlay: DepthOverlayConfig,
    pub scene: SceneConfig,
    pub simulation: SimulationConfig,
}

impl ArConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ArError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ArError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ArError> {
        self.session.validate()?;

        if self.depth_overlay.stride == 0 {
            return Err(ArError::InvalidConfig(
                "depthOverlay.stride must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.depth_overlay.alpha) {
            return Err(ArError::InvalidConfig(
                "depthOverlay.alpha must be within [0, 1]".to_string(),
            ));
        }
        if self.simulation.viewport.contains(&0) {
            return Err(ArError::InvalidConfig(
                "simulation.viewport must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Template model URIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetConfig {
    pub reticle: String,
    pub placeable: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            reticle: RETICLE_MODEL_PATH.to_string(),
            placeable: PLACEABLE_MODEL_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepthOverlayConfig {
    /// Paint the overlay when the session grants depth sensing.
    pub enabled: bool,
    /// Grid spacing in canvas pixels.
    pub stride: u32,
    pub alpha: f32,
}

impl Default for DepthOverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stride: DEPTH_GRID_STRIDE,
            alpha: DEPTH_OVERLAY_ALPHA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneConfig {
    pub shadow_node_name: String,
    /// Add a shadow plane node at startup.
    pub shadow_plane: bool,
    pub shadow_plane_size: f32,
    pub light_intensity: f32,
    pub light_height: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shadow_node_name: SHADOW_NODE_NAME.to_string(),
            shadow_plane: true,
            shadow_plane_size: SHADOW_PLANE_SIZE,
            light_intensity: LIGHT_INTENSITY,
            light_height: LIGHT_HEIGHT,
        }
    }
}

/// Periodic scripted tracking loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingLossConfig {
    pub every_frames: u32,
    pub duration_frames: u32,
}

/// Capabilities and motion of the built-in simulated runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub supported_features: Vec<SessionFeature>,
    pub depth_usage: Vec<DepthUsage>,
    pub depth_formats: Vec<DepthDataFormat>,
    /// Width, height in pixels.
    pub viewport: [u32; 2],
    pub depth_resolution: [u32; 2],
    pub field_of_view_y: f32,
    pub eye_height: f32,
    pub orbit_radius: f32,
    /// Radians per second.
    pub orbit_speed: f32,
    pub look_down: f32,
    /// Heights of the horizontal surfaces hit tests can find.
    pub surfaces: Vec<f32>,
    pub depth_warmup_frames: u32,
    pub tracking_loss: Option<TrackingLossConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            supported_features: vec![
                SessionFeature::HitTest,
                SessionFeature::DepthSensing,
                SessionFeature::Local,
                SessionFeature::Viewer,
            ],
            depth_usage: vec![DepthUsage::CpuOptimized, DepthUsage::GpuOptimized],
            depth_formats: vec![DepthDataFormat::LuminanceAlpha, DepthDataFormat::Float32],
            viewport: [VIEWPORT_WIDTH, VIEWPORT_HEIGHT],
            depth_resolution: [DEPTH_WIDTH, DEPTH_HEIGHT],
            field_of_view_y: FIELD_OF_VIEW_Y,
            eye_height: EYE_HEIGHT,
            orbit_radius: ORBIT_RADIUS,
            orbit_speed: ORBIT_SPEED,
            look_down: LOOK_DOWN,
            surfaces: vec![FLOOR_HEIGHT],
            depth_warmup_frames: 0,
            tracking_loss: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ArConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ArConfig::default());
        assert_eq!(config.depth_overlay.stride, 20);
        assert_eq!(config.scene.shadow_node_name, "shadowMesh");
        assert!(config.session.requires(SessionFeature::HitTest));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ArConfig::from_json_str(
            r#"{
                "depthOverlay": { "stride": 8 },
                "scene": { "shadowPlane": false },
                "simulation": { "trackingLoss": { "everyFrames": 10, "durationFrames": 2 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.depth_overlay.stride, 8);
        assert_eq!(config.depth_overlay.alpha, 0.5);
        assert!(config.depth_overlay.enabled);
        assert!(!config.scene.shadow_plane);
        assert_eq!(config.scene.light_intensity, 0.3);
        assert_eq!(
            config.simulation.tracking_loss,
            Some(TrackingLossConfig {
                every_frames: 10,
                duration_frames: 2
            })
        );
    }

    #[test]
    fn zero_stride_is_rejected() {
        let err = ArConfig::from_json_str(r#"{ "depthOverlay": { "stride": 0 } }"#).unwrap_err();
        assert!(matches!(err, ArError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_an_invalid_config() {
        let err = ArConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ArError::InvalidConfig(_)));
    }

    #[test]
    fn depth_feature_without_preferences_is_rejected() {
        let err = ArConfig::from_json_str(
            r#"{ "session": { "requiredFeatures": ["hit-test", "depth-sensing"] } }"#,
        )
        .unwrap_err();
        assert_eq!(err, ArError::MissingDepthConfiguration);
    }
}
