use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::asset_paths::CONFIG_PATH;

use super::model_loader::ModelLoader;
use super::progress::LoadingProgress;
use crate::config::ArConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::render::BevyRenderTarget;
use crate::engine::scene::OverlayCanvas;
use crate::engine::scheduler::ArSessionDriver;
use crate::engine::simulation::SimulatedRuntime;
use crate::error::ArError;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ArConfig>>,
}

/// Config the running session was started with.
#[derive(Resource, Debug, Clone)]
pub struct ActiveConfig(pub ArConfig);

/// Why the session never started.
#[derive(Resource, Debug, Clone)]
pub struct SessionFailure(pub ArError);

pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    println!("Loading config from: {CONFIG_PATH}");
    config_loader.handle = Some(asset_server.load(CONFIG_PATH));
}

/// Once the config resolves, negotiate the session and install the driver.
///
/// Exclusive because the driver and the simulated runtime's control handle
/// are non-send resources.
pub fn activate_session_when_ready(world: &mut World) {
    let Some(config) = resolve_config(world) else {
        return;
    };
    world.resource_mut::<LoadingProgress>().config_loaded = true;

    let mut runtime = SimulatedRuntime::new(config.simulation.clone());
    let [width, height] = config.simulation.viewport;
    let started = ArSessionDriver::start(
        &mut runtime,
        &config,
        BevyRenderTarget::new(),
        OverlayCanvas::new(width, height),
    );

    match started {
        Ok(driver) => {
            println!("✓ AR session started");
            world.insert_non_send_resource(driver);
            if let Some(control) = runtime.control() {
                world.insert_non_send_resource(control);
            }

            let models = ModelLoader::start(world.resource::<AssetServer>(), &config.assets);
            world.insert_resource(models);
            world.insert_resource(ActiveConfig(config));
            world.resource_mut::<LoadingProgress>().session_started = true;

            println!("→ Transitioning to Running state");
            world
                .resource_mut::<NextState<AppState>>()
                .set(AppState::Running);
        }
        Err(err) => {
            error!("AR session could not start: {err}");
            world.insert_resource(SessionFailure(err));
            world
                .resource_mut::<NextState<AppState>>()
                .set(AppState::SessionFailed);
        }
    }
}

/// Loaded config, defaults when the document failed to load, `None` while
/// still loading.
fn resolve_config(world: &World) -> Option<ArConfig> {
    let handle = world.resource::<ConfigLoader>().handle.clone()?;

    if let Some(config) = world.resource::<Assets<ArConfig>>().get(&handle) {
        println!("✓ Config loaded");
        return Some(config.clone());
    }

    match world.resource::<AssetServer>().load_state(&handle) {
        LoadState::Failed(err) => {
            warn!("Config {CONFIG_PATH} failed to load ({err}), using defaults");
            Some(ArConfig::default())
        }
        _ => None,
    }
}
