use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::camera::Viewport as CameraViewport;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use constants::render_settings::{CLEAR_COLOUR, LIGHT_LUX_PER_UNIT, SHADOW_PLANE_COLOUR};

use super::SceneRenderer;
use crate::engine::camera::XrCamera;
use crate::engine::scene::{
    DepthCanvas, NodeContent, NodeId, OverlayCanvas, SceneGraph, SceneNode,
};
use crate::engine::systems::session_pump::ArDriver;

/// Camera driven by the tracked view.
#[derive(Component)]
pub struct ArCamera;

/// Links an entity back to its scene graph node.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodeEntity(pub NodeId);

#[derive(Resource, Default)]
pub struct SceneEntityMap {
    entities: HashMap<NodeId, Entity>,
}

impl SceneEntityMap {
    pub fn get(&self, id: NodeId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Resource)]
pub struct DepthOverlayImage(pub Handle<Image>);

/// One draw call as seen by the ECS side.
#[derive(Debug, Clone)]
pub struct RenderSubmission {
    pub size: UVec2,
    pub camera: XrCamera,
    /// Scene snapshot, present only when the graph changed since the last
    /// submission.
    pub nodes: Option<Vec<(NodeId, SceneNode)>>,
}

/// [`SceneRenderer`] that buffers each draw for [`apply_render_submission`].
#[derive(Debug, Default)]
pub struct BevyRenderTarget {
    size: UVec2,
    pending: Option<RenderSubmission>,
    last_revision: Option<u64>,
    draws: u64,
}

impl BevyRenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn take_submission(&mut self) -> Option<RenderSubmission> {
        self.pending.take()
    }
}

impl SceneRenderer for BevyRenderTarget {
    fn set_size(&mut self, size: UVec2) {
        self.size = size;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &XrCamera) {
        let revision = scene.revision();
        let nodes = if self.last_revision != Some(revision) {
            self.last_revision = Some(revision);
            Some(scene.iter().map(|(id, node)| (id, node.clone())).collect())
        } else {
            // Unchanged graph, but an earlier snapshot may still be waiting.
            self.pending.take().and_then(|previous| previous.nodes)
        };

        self.pending = Some(RenderSubmission {
            size: self.size,
            camera: camera.clone(),
            nodes,
        });
        self.draws += 1;
    }
}

pub fn spawn_ar_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(CLEAR_COLOUR),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection::default()),
        Transform::default(),
        ArCamera,
    ));
}

/// Full-window UI image the depth grid is uploaded into.
pub fn spawn_depth_overlay(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let handle = images.add(overlay_image(&OverlayCanvas::new(1, 1)));

    commands.spawn((
        ImageNode::new(handle.clone()),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        Name::new("depth_overlay"),
    ));
    commands.insert_resource(DepthOverlayImage(handle));
}

/// Apply the latest buffered draw: camera matrices, viewport, and any scene
/// graph changes.
pub fn apply_render_submission(
    mut commands: Commands,
    driver: Option<NonSendMut<ArDriver>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&mut Transform, &mut Projection, &mut Camera), With<ArCamera>>,
    mut nodes: Query<(&mut Transform, &mut Visibility), (With<SceneNodeEntity>, Without<ArCamera>)>,
    mut entity_map: ResMut<SceneEntityMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut driver) = driver else {
        return;
    };
    let Some(submission) = driver.renderer_mut().take_submission() else {
        return;
    };

    if let Ok((mut transform, mut projection, mut camera)) = cameras.single_mut() {
        let xr = &submission.camera;
        *transform = xr.transform();

        let (near, far) = xr.clip_planes();
        *projection = Projection::Perspective(PerspectiveProjection {
            fov: xr.fov_y(),
            aspect_ratio: xr.aspect_ratio(),
            near,
            far,
            ..default()
        });

        let mut size = submission.size;
        if let Ok(window) = windows.single() {
            size = size.min(window.physical_size());
        }
        camera.viewport = (size.x > 0 && size.y > 0).then(|| CameraViewport {
            physical_position: UVec2::ZERO,
            physical_size: size,
            ..default()
        });
    }

    let Some(snapshot) = submission.nodes else {
        return;
    };

    let mut seen = Vec::with_capacity(snapshot.len());
    for (id, node) in snapshot {
        seen.push(id);
        let visibility = if node.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        if let Some(entity) = entity_map.get(id) {
            if let Ok((mut transform, mut current)) = nodes.get_mut(entity) {
                *transform = node.transform;
                *current = visibility;
            }
            continue;
        }

        let mut entity = commands.spawn((
            node.transform,
            visibility,
            SceneNodeEntity(id),
            Name::new(node.name.clone()),
        ));
        match &node.content {
            NodeContent::Model(scene) => {
                entity.insert(SceneRoot(scene.clone()));
            }
            NodeContent::ShadowPlane { size } => {
                entity.insert((
                    Mesh3d(meshes.add(Plane3d::default().mesh().size(*size, *size))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: SHADOW_PLANE_COLOUR,
                        alpha_mode: AlphaMode::Blend,
                        unlit: true,
                        ..default()
                    })),
                ));
            }
            NodeContent::DirectionalLight { intensity } => {
                entity.insert(DirectionalLight {
                    illuminance: intensity * LIGHT_LUX_PER_UNIT,
                    shadows_enabled: true,
                    ..default()
                });
            }
        }
        entity_map.entities.insert(id, entity.id());
    }

    entity_map.entities.retain(|id, entity| {
        if seen.contains(id) {
            true
        } else {
            commands.entity(*entity).despawn();
            false
        }
    });
}

/// Despawn everything mirrored from the scene graph and blank the overlay.
pub fn clear_scene_entities(
    mut commands: Commands,
    mut entity_map: ResMut<SceneEntityMap>,
    overlay: Option<Res<DepthOverlayImage>>,
    mut images: ResMut<Assets<Image>>,
) {
    for (_, entity) in entity_map.entities.drain() {
        commands.entity(entity).despawn();
    }
    let Some(overlay) = overlay else {
        return;
    };
    if let Some(image) = images.get_mut(&overlay.0) {
        *image = overlay_image(&OverlayCanvas::new(1, 1));
    }
}

/// Copy the painted depth grid into the overlay image, keeping the canvas
/// the same size as the window.
pub fn upload_depth_overlay(
    driver: Option<NonSendMut<ArDriver>>,
    overlay: Option<Res<DepthOverlayImage>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
) {
    let (Some(mut driver), Some(overlay)) = (driver, overlay) else {
        return;
    };

    let canvas = driver.depth_canvas_mut();
    if let Ok(window) = windows.single() {
        let size = window.physical_size();
        if size.x > 0 && size.y > 0 {
            canvas.resize(size.x, size.y);
        }
    }

    if !canvas.take_dirty() {
        return;
    }
    if let Some(image) = images.get_mut(&overlay.0) {
        *image = overlay_image(canvas);
    }
}

fn overlay_image(canvas: &OverlayCanvas) -> Image {
    let size = canvas.size();
    Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        canvas.pixels().to_vec(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> XrCamera {
        XrCamera::default()
    }

    #[test]
    fn snapshot_only_when_graph_changes() {
        let mut scene = SceneGraph::new();
        scene.add(SceneNode::new("light", NodeContent::DirectionalLight { intensity: 0.3 }));
        let mut target = BevyRenderTarget::new();

        target.set_size(UVec2::new(640, 480));
        target.render(&scene, &camera());
        let first = target.take_submission().unwrap();
        assert_eq!(first.size, UVec2::new(640, 480));
        assert_eq!(first.nodes.map(|n| n.len()), Some(1));

        target.render(&scene, &camera());
        assert!(target.take_submission().unwrap().nodes.is_none());
        assert_eq!(target.draws(), 2);
    }

    #[test]
    fn unconsumed_snapshot_survives_the_next_draw() {
        let mut scene = SceneGraph::new();
        let mut target = BevyRenderTarget::new();

        scene.add(SceneNode::new("light", NodeContent::DirectionalLight { intensity: 0.3 }));
        target.render(&scene, &camera());
        target.render(&scene, &camera());

        let submission = target.take_submission().unwrap();
        assert_eq!(submission.nodes.map(|n| n.len()), Some(1));
    }
}
