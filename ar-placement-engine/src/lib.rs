//! Markerless AR surface placement.
//!
//! A tracking session drives a per-frame loop that keeps a reticle on the
//! best detected surface, optionally paints the depth map as a greyscale
//! grid, and renders the scene through the tracked camera. A select gesture
//! anchors a copy of the placeable model at the reticle.

pub mod config;
pub mod engine;
pub mod error;
pub mod tools;
