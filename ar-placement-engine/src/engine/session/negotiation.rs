use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::session::TrackingSession;
use crate::error::ArError;

/// Session modes a runtime may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    #[default]
    ImmersiveAr,
    ImmersiveVr,
    Inline,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ImmersiveAr => "immersive-ar",
            Self::ImmersiveVr => "immersive-vr",
            Self::Inline => "inline",
        };
        f.write_str(name)
    }
}

/// Capabilities that can be requested at negotiation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionFeature {
    HitTest,
    DepthSensing,
    Local,
    Viewer,
}

impl fmt::Display for SessionFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HitTest => "hit-test",
            Self::DepthSensing => "depth-sensing",
            Self::Local => "local",
            Self::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

/// Where depth data is produced and consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthUsage {
    CpuOptimized,
    GpuOptimized,
}

/// Sample layout of the depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthDataFormat {
    LuminanceAlpha,
    Float32,
}

/// Ordered depth-sensing preferences, most preferred first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthSensingInit {
    pub usage_preference: Vec<DepthUsage>,
    #[serde(alias = "dataFormatPreference")]
    pub format_preference: Vec<DepthDataFormat>,
}

impl Default for DepthSensingInit {
    fn default() -> Self {
        Self {
            usage_preference: vec![DepthUsage::CpuOptimized, DepthUsage::GpuOptimized],
            format_preference: vec![DepthDataFormat::LuminanceAlpha, DepthDataFormat::Float32],
        }
    }
}

/// Depth configuration the runtime actually granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedDepth {
    pub usage: DepthUsage,
    pub format: DepthDataFormat,
}

impl DepthSensingInit {
    /// Pick the first preferred usage and format that the runtime supports.
    pub fn resolve(
        &self,
        supported_usage: &[DepthUsage],
        supported_formats: &[DepthDataFormat],
    ) -> Option<NegotiatedDepth> {
        let usage = self
            .usage_preference
            .iter()
            .find(|u| supported_usage.contains(u))?;
        let format = self
            .format_preference
            .iter()
            .find(|f| supported_formats.contains(f))?;
        Some(NegotiatedDepth {
            usage: *usage,
            format: *format,
        })
    }
}

/// Feature request handed to the negotiator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInit {
    #[serde(default)]
    pub mode: SessionMode,
    #[serde(default)]
    pub required_features: Vec<SessionFeature>,
    #[serde(default)]
    pub optional_features: Vec<SessionFeature>,
    #[serde(default)]
    pub depth_sensing: Option<DepthSensingInit>,
}

impl Default for SessionInit {
    fn default() -> Self {
        Self {
            mode: SessionMode::ImmersiveAr,
            required_features: vec![SessionFeature::HitTest],
            optional_features: vec![SessionFeature::DepthSensing],
            depth_sensing: Some(DepthSensingInit::default()),
        }
    }
}

impl SessionInit {
    pub fn requires(&self, feature: SessionFeature) -> bool {
        self.required_features.contains(&feature)
    }

    pub fn requests(&self, feature: SessionFeature) -> bool {
        self.requires(feature) || self.optional_features.contains(&feature)
    }

    /// Check the request is well formed before it reaches a runtime.
    pub fn validate(&self) -> Result<(), ArError> {
        if !self.requires(SessionFeature::HitTest) {
            return Err(ArError::InvalidConfig(
                "`hit-test` must be listed in requiredFeatures".to_string(),
            ));
        }

        if self.requests(SessionFeature::DepthSensing) {
            match &self.depth_sensing {
                Some(depth)
                    if !depth.usage_preference.is_empty()
                        && !depth.format_preference.is_empty() => {}
                _ => return Err(ArError::MissingDepthConfiguration),
            }
        }

        Ok(())
    }
}

/// Establishes tracking sessions. Failure is fatal to session start and is
/// never retried.
pub trait SessionNegotiator {
    fn request_session(&mut self, init: &SessionInit) -> Result<Box<dyn TrackingSession>, ArError>;
}
