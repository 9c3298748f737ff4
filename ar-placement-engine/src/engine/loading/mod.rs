//! Asset loading for the AR session.
//!
//! The config document is loaded first; once it resolves (or fails, in
//! which case defaults apply) the session is negotiated and the template
//! models start loading in the background.

/// Config asset loading and session activation.
///
/// Negotiates the session from the loaded config and installs the driver.
pub mod config_loader;

/// Reticle and placeable glTF loading.
///
/// Hands each template to the session driver once it and its dependencies
/// are loaded.
pub mod model_loader;

/// Loading milestone tracking.
pub mod progress;
