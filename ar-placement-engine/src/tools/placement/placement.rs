use bevy::prelude::*;
use constants::asset_paths::{PLACED_NODE_PREFIX, SHADOW_NODE_NAME};

use super::state::Reticle;
use crate::engine::scene::{ModelTemplate, NodeId, SceneGraph};
use crate::engine::session::Pose;

/// Result of one select gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectOutcome {
    Placed {
        node: NodeId,
        position: Vec3,
        /// False when the scene has no shadow node to keep level.
        shadow_synced: bool,
    },
    /// Placeable model still loading.
    TemplateNotLoaded,
    /// No surface has been detected yet.
    NoSurface,
}

/// Owns the reticle, the placeable template and the placed objects.
#[derive(Debug)]
pub struct PlacementController {
    reticle: Reticle,
    placeable: Option<ModelTemplate>,
    placed: Vec<NodeId>,
    shadow_node_name: String,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self::new(SHADOW_NODE_NAME)
    }
}

impl PlacementController {
    pub fn new(shadow_node_name: impl Into<String>) -> Self {
        Self {
            reticle: Reticle::default(),
            placeable: None,
            placed: Vec::new(),
            shadow_node_name: shadow_node_name.into(),
        }
    }

    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    pub fn placed(&self) -> &[NodeId] {
        &self.placed
    }

    /// Reticle model finished loading.
    pub fn install_reticle(&mut self, template: &ModelTemplate, scene: &mut SceneGraph) -> NodeId {
        self.reticle.attach(template, scene)
    }

    /// Placeable model finished loading.
    pub fn install_placeable(&mut self, template: ModelTemplate) {
        self.placeable = Some(template);
    }

    /// Per-frame reticle update from the surface detector's best hit.
    pub fn update_reticle(&mut self, hit: Option<Pose>, scene: &mut SceneGraph) -> bool {
        self.reticle.track(hit, scene)
    }

    /// Clone the placeable at the reticle's current position.
    pub fn on_select(&mut self, scene: &mut SceneGraph) -> SelectOutcome {
        let Some(template) = &self.placeable else {
            return SelectOutcome::TemplateNotLoaded;
        };
        let Some(position) = self.reticle.position() else {
            return SelectOutcome::NoSurface;
        };

        let name = format!("{}-{}", PLACED_NODE_PREFIX, self.placed.len());
        let node = scene.add(template.instantiate(name).with_translation(position));
        self.placed.push(node);

        let shadow_synced = match scene.find_by_name_mut(&self.shadow_node_name) {
            Some(shadow) => {
                shadow.transform.translation.y = position.y;
                true
            }
            None => {
                debug!(
                    "No `{}` node in scene, skipping shadow sync",
                    self.shadow_node_name
                );
                false
            }
        };

        info!(
            "Placed {} at {:?} ({} placed)",
            template.uri,
            position,
            self.placed.len()
        );

        SelectOutcome::Placed {
            node,
            position,
            shadow_synced,
        }
    }

    /// Forget everything tied to a torn-down scene.
    pub fn reset(&mut self) {
        self.reticle = Reticle::default();
        self.placeable = None;
        self.placed.clear();
    }
}
