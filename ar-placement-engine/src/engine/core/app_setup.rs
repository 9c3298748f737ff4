// External crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::config::ArConfig;
// Crate engine modules
use crate::engine::core::app_state::{AppState, announce_session_ended, announce_session_failed};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{
    ConfigLoader, activate_session_when_ready, start_loading,
};
use crate::engine::loading::model_loader::deliver_loaded_models;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::render::{
    SceneEntityMap, apply_render_submission, clear_scene_entities, spawn_ar_camera,
    spawn_depth_overlay, upload_depth_overlay,
};
use crate::engine::systems::session_pump::{advance_simulated_tracking, pump_session_events};
use crate::engine::systems::status_hud::{create_status_hud, status_text_update_system};
// Crate tools modules
use crate::tools::placement::interactions::{end_session_on_escape, select_on_click};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ArConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ArConfig>::new(&["json"]));

    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<SceneEntityMap>();

    app.add_systems(
        Startup,
        (
            spawn_ar_camera,
            spawn_depth_overlay,
            create_status_hud,
            start_loading,
        ),
    )
    .add_systems(
        Update,
        activate_session_when_ready.run_if(in_state(AppState::Loading)),
    )
    .add_systems(
        OnEnter(AppState::Ended),
        (announce_session_ended, clear_scene_entities),
    )
    .add_systems(OnEnter(AppState::SessionFailed), announce_session_failed);

    // Input first, then runtime tick, event pump, and the ECS mirror of
    // whatever the frame callback drew.
    app.add_systems(
        Update,
        (
            select_on_click,
            end_session_on_escape,
            advance_simulated_tracking,
            pump_session_events,
            deliver_loaded_models,
            apply_render_submission,
            upload_depth_overlay,
        )
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    // Templates that finish loading after the end are handed over and
    // dropped by the driver.
    app.add_systems(
        Update,
        deliver_loaded_models.run_if(in_state(AppState::Ended)),
    );

    app.add_systems(Update, status_text_update_system);

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
