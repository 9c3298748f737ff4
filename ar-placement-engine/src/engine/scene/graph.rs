use std::collections::BTreeMap;

use bevy::prelude::*;

/// Stable identifier of a node within one scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// What the renderer draws for a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Instance of a loaded glTF scene.
    Model(Handle<Scene>),
    /// Square shadow-catcher plane of the given edge length.
    ShadowPlane { size: f32 },
    /// White directional light pointing at the origin.
    DirectionalLight { intensity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub content: NodeContent,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visible: true,
            content,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_model(&self) -> bool {
        matches!(self.content, NodeContent::Model(_))
    }
}

/// A loaded model usable as a clone source.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTemplate {
    pub uri: String,
    pub scene: Handle<Scene>,
}

impl ModelTemplate {
    pub fn new(uri: impl Into<String>, scene: Handle<Scene>) -> Self {
        Self {
            uri: uri.into(),
            scene,
        }
    }

    /// Fresh node sharing this template's scene asset.
    pub fn instantiate(&self, name: impl Into<String>) -> SceneNode {
        SceneNode::new(name, NodeContent::Model(self.scene.clone()))
    }
}

/// Scene graph read by the renderer once per tracked frame.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u32,
    revision: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        self.revision += 1;
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let node = self.nodes.get_mut(&id)?;
        self.revision += 1;
        Some(node)
    }

    /// First node carrying `name`, if any.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| *id)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        let id = self.find_by_name(name)?;
        self.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn model_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_model()).count()
    }

    /// Bumped on every mutation; lets the renderer bridge skip unchanged
    /// frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop every node (session teardown).
    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.nodes.clear();
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_is_optional() {
        let mut scene = SceneGraph::new();
        assert!(scene.find_by_name("shadowMesh").is_none());

        let id = scene.add(SceneNode::new(
            "shadowMesh",
            NodeContent::ShadowPlane { size: 2.0 },
        ));
        assert_eq!(scene.find_by_name("shadowMesh"), Some(id));

        scene.find_by_name_mut("shadowMesh").unwrap().transform.translation.y = 0.4;
        assert_eq!(scene.get(id).unwrap().transform.translation.y, 0.4);
    }

    #[test]
    fn instances_share_the_template_asset() {
        let template = ModelTemplate::new("models/sunflower.gltf", Handle::default());
        let mut scene = SceneGraph::new();
        let a = scene.add(template.instantiate("placed-0"));
        let b = scene.add(template.instantiate("placed-1"));

        assert_ne!(a, b);
        assert_eq!(scene.model_count(), 2);
        assert_eq!(scene.get(a).unwrap().content, scene.get(b).unwrap().content);
    }

    #[test]
    fn revision_tracks_mutations() {
        let mut scene = SceneGraph::new();
        let start = scene.revision();
        let id = scene.add(SceneNode::new(
            "light",
            NodeContent::DirectionalLight { intensity: 0.3 },
        ));
        assert!(scene.revision() > start);

        let after_add = scene.revision();
        let _ = scene.get(id);
        assert_eq!(scene.revision(), after_add);

        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.revision() > after_add);
    }
}
