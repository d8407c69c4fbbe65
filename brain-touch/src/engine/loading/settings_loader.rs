use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::SETTINGS_PATH;

use crate::engine::loading::progress::LoadingProgress;
use crate::game::session::GameSession;
use crate::game::settings::GameSettings;

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<GameSettings>>,
}

// Start the loading process
pub fn start_loading(mut settings_loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    println!("Loading settings from: {}", SETTINGS_PATH);
    settings_loader.handle = Some(asset_server.load(SETTINGS_PATH));
}

/// Applies the settings file once it resolves. A missing or malformed file
/// is not an error: the built-in defaults stay in place.
pub fn resolve_settings_system(
    mut loading_progress: ResMut<LoadingProgress>,
    settings_loader: Res<SettingsLoader>,
    asset_server: Res<AssetServer>,
    settings_assets: Res<Assets<GameSettings>>,
    mut settings: ResMut<GameSettings>,
    mut session: ResMut<GameSession>,
) {
    if loading_progress.settings_resolved {
        return;
    }
    let Some(handle) = settings_loader.handle.as_ref() else {
        return;
    };

    if let Some(loaded) = settings_assets.get(handle) {
        *settings = loaded.clone().sanitised();
        *session = GameSession::from_settings(&settings);
        loading_progress.settings_resolved = true;
        println!("✓ Settings loaded");
        info!("Game settings: {:?}", *settings);
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        warn!("Settings unavailable ({}), using defaults", err);
        loading_progress.settings_resolved = true;
    }
}
