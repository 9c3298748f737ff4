//! Scene contents shared by the frame loop, the placement tool and the
//! renderer bridge.
//!
//! The scene graph is plain data: the core mutates it between frames and
//! the renderer reads it once per tracked frame. Named lookups return
//! `Option`, so a missing auxiliary node is skipped rather than faulting.

/// Flat scene graph of named nodes with optional lookup by name.
pub mod graph;

/// Sparse greyscale visualisation of per-pixel depth onto a 2D canvas.
pub mod depth_overlay;

pub use depth_overlay::{DepthCanvas, DepthVisualizer, OverlayCanvas, depth_to_intensity};
pub use graph::{ModelTemplate, NodeContent, NodeId, SceneGraph, SceneNode};
