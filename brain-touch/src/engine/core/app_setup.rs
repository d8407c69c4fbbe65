use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::core::app_state::{
    AppState, transition_to_assets_loaded, transition_to_load_failed, transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::model_loader::{ModelLoader, load_model_system, request_model_system};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::settings_loader::{
    SettingsLoader, resolve_settings_system, start_loading,
};
use crate::engine::scene::camera::spawn_viewer_camera;
use crate::engine::scene::model::{place_brain_model, sync_model_to_session};
use crate::engine::scene::target_marker::{
    draw_collider_gizmo, spawn_target_marker, sync_target_marker,
};
use crate::engine::shaders::PointSpriteMaterial;
// Game and input
use crate::game::settings::GameSettings;
use crate::game::{GamePlugin, GameSet};
use crate::input::InputPlugin;
use crate::input::drag::handle_drag_input;
// Web RPC modules
use crate::rpc::notifications::{fps_notification_system, publish_session_changes};
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::camera::camera_controller;
#[cfg(not(target_arch = "wasm32"))]
use crate::ui::hud::{fps_text_update_system, spawn_hud, update_hud_text};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers GameSettings as a loadable asset type from *.settings.json files.
        .add_plugins(JsonAssetPlugin::<GameSettings>::new(&["settings.json"]))
        .add_plugins(MaterialPlugin::<PointSpriteMaterial>::default())
        .add_plugins(GamePlugin)
        .add_plugins(InputPlugin)
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<SettingsLoader>()
        .init_resource::<ModelLoader>();

    // State-based system scheduling
    app.add_systems(
        Startup,
        (spawn_viewer_camera, spawn_target_marker, start_loading),
    )
    .add_systems(
        Update,
        (
            // Loading phase systems
            resolve_settings_system,
            request_model_system,
            load_model_system,
            transition_to_assets_loaded,
            transition_to_load_failed,
        )
            .chain()
            .run_if(in_state(AppState::Loading)),
    )
    .add_systems(
        Update,
        (place_brain_model, transition_to_running)
            .chain()
            .after(GameSet::Input)
            .before(GameSet::Simulation)
            .run_if(in_state(AppState::AssetsLoaded)),
    )
    .add_systems(
        Update,
        sync_model_to_session
            .after(handle_drag_input)
            .before(GameSet::Simulation)
            .run_if(in_state(AppState::Running)),
    )
    .add_systems(
        Update,
        (
            sync_target_marker,
            draw_collider_gizmo,
            publish_session_changes,
            fps_notification_system,
        )
            .in_set(GameSet::Presentation),
    );

    // Desktop stand-ins for the host page: fly camera and text overlays.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, camera_controller.before(GameSet::Input))
            .add_systems(
                Update,
                (update_hud_text, fps_text_update_system).in_set(GameSet::Presentation),
            );
    }

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
