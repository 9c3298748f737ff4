use bevy::prelude::*;

use crate::engine::session::{
    DepthInformation, NegotiatedDepth, SessionFeature, TrackedFrame, TrackingSession, View,
};

/// Depth-sensing subsystem. Exists only when the session granted it.
#[derive(Debug, Clone, Copy)]
pub struct DepthSampler {
    configuration: NegotiatedDepth,
}

impl DepthSampler {
    pub fn new(configuration: NegotiatedDepth) -> Self {
        Self { configuration }
    }

    /// `Some` only when depth sensing was negotiated for `session`.
    pub fn for_session(session: &dyn TrackingSession) -> Option<Self> {
        if !session.is_feature_enabled(SessionFeature::DepthSensing) {
            return None;
        }

        let configuration = session.depth_configuration()?;
        info!(
            "Depth sensing enabled: usage {:?}, format {:?}",
            configuration.usage, configuration.format
        );
        Some(Self::new(configuration))
    }

    pub fn configuration(&self) -> NegotiatedDepth {
        self.configuration
    }

    /// Depth map for `view`, borrowed from the frame. `None` while the
    /// sensor warms up.
    pub fn sample<'f>(
        &self,
        frame: &'f dyn TrackedFrame,
        view: &View,
    ) -> Option<Box<dyn DepthInformation + 'f>> {
        frame.depth_information(view)
    }
}
