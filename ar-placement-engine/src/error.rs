use thiserror::Error;

use crate::engine::session::{ReferenceSpaceType, SessionFeature, SessionMode};

/// Errors surfaced by session negotiation and configuration.
///
/// Per-frame data absence (no pose, no hits, no depth) is never an error;
/// those are `Option`s resolved by skipping the dependent step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArError {
    #[error("session mode `{0}` is not supported by this runtime")]
    UnsupportedMode(SessionMode),

    #[error("required feature `{0}` is not supported by this runtime")]
    UnsupportedFeature(SessionFeature),

    #[error("depth-sensing was requested without a depthSensing preference block")]
    MissingDepthConfiguration,

    #[error("no supported depth usage/format combination in the preference lists")]
    DepthConfigurationUnsatisfiable,

    #[error("reference space `{0:?}` is not available")]
    ReferenceSpaceUnavailable(ReferenceSpaceType),

    #[error("session has ended")]
    SessionEnded,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
