use bevy::prelude::*;
use constants::asset_paths::RETICLE_NODE_NAME;

use crate::engine::scene::{ModelTemplate, NodeId, SceneGraph};
use crate::engine::session::Pose;

/// Surface cursor. Hidden until the first hit; afterwards it keeps its last
/// pose through frames without hits instead of hiding again.
#[derive(Debug, Default, Clone)]
pub struct Reticle {
    node: Option<NodeId>,
    pose: Option<Pose>,
    visible: bool,
}

impl Reticle {
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Last surface pose, `None` until the first hit.
    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Insert the loaded reticle model, hidden. Returns the existing node if
    /// already attached.
    pub fn attach(&mut self, template: &ModelTemplate, scene: &mut SceneGraph) -> NodeId {
        if let Some(node) = self.node {
            return node;
        }
        let node = scene.add(template.instantiate(RETICLE_NODE_NAME).hidden());
        self.node = Some(node);
        node
    }

    /// Apply this frame's best hit. No-op before the model loads or when
    /// there is no hit. Returns whether the pose changed.
    pub fn track(&mut self, hit: Option<Pose>, scene: &mut SceneGraph) -> bool {
        let (Some(node), Some(hit)) = (self.node, hit) else {
            return false;
        };

        self.visible = true;
        self.pose = Some(hit);
        if let Some(reticle) = scene.get_mut(node) {
            reticle.visible = true;
            reticle.transform.translation = hit.position;
        }
        true
    }

    pub fn position(&self) -> Option<Vec3> {
        self.pose.map(|pose| pose.position)
    }
}
