use bevy::asset::LoadState;
use bevy::prelude::*;

use super::progress::LoadingProgress;
use crate::config::AssetConfig;
use crate::engine::scene::ModelTemplate;
use crate::engine::systems::session_pump::ArDriver;

#[derive(Debug)]
struct PendingModel {
    uri: String,
    handle: Handle<Scene>,
    delivered: bool,
    failed: bool,
}

impl PendingModel {
    fn load(asset_server: &AssetServer, uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            handle: asset_server.load(GltfAssetLabel::Scene(0).from_asset(uri.to_string())),
            delivered: false,
            failed: false,
        }
    }

    /// Template once the scene and everything it references has loaded.
    /// Yields at most once.
    fn poll(&mut self, asset_server: &AssetServer) -> Option<ModelTemplate> {
        if self.delivered || self.failed {
            return None;
        }

        if asset_server.is_loaded_with_dependencies(&self.handle) {
            self.delivered = true;
            println!("✓ Model loaded: {}", self.uri);
            return Some(ModelTemplate::new(self.uri.clone(), self.handle.clone()));
        }

        if let LoadState::Failed(err) = asset_server.load_state(&self.handle) {
            warn!("Model {} failed to load: {err}", self.uri);
            self.failed = true;
        }
        None
    }
}

/// The two template models, loading independently of each other.
#[derive(Resource, Debug)]
pub struct ModelLoader {
    reticle: PendingModel,
    placeable: PendingModel,
}

impl ModelLoader {
    pub fn start(asset_server: &AssetServer, assets: &AssetConfig) -> Self {
        Self {
            reticle: PendingModel::load(asset_server, &assets.reticle),
            placeable: PendingModel::load(asset_server, &assets.placeable),
        }
    }
}

/// Hand finished templates to the driver. Runs in every post-loading state;
/// the driver ignores templates that arrive after the session ended.
pub fn deliver_loaded_models(
    asset_server: Res<AssetServer>,
    mut model_loader: ResMut<ModelLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    driver: Option<NonSendMut<ArDriver>>,
) {
    let Some(mut driver) = driver else {
        return;
    };

    if let Some(template) = model_loader.reticle.poll(&asset_server) {
        loading_progress.reticle_loaded = driver.on_reticle_loaded(template);
    }
    if let Some(template) = model_loader.placeable.poll(&asset_server) {
        loading_progress.placeable_loaded = driver.on_placeable_loaded(template);
    }
}
