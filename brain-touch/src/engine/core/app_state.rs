use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

/// ```text
/// Loading ──point cloud ready──> AssetsLoaded ──first select──> Running
///    │
///    └──model unusable──> LoadFailed
/// ```
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    /// Point cloud extracted, waiting for the player to place the model.
    AssetsLoaded,
    Running,
    /// Terminal: the game never becomes startable.
    LoadFailed,
}

// Transition to AssetsLoaded state
pub fn transition_to_assets_loaded(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.point_cloud_created {
        println!("→ Transitioning to AssetsLoaded state");
        next_state.set(AppState::AssetsLoaded);
    }
}

pub fn transition_to_load_failed(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if let Some(reason) = &loading_progress.failure {
        println!("→ Transitioning to LoadFailed state: {}", reason);
        next_state.set(AppState::LoadFailed);
    }
}

// Final transition once the model is in the scene
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.model_placed {
        println!("→ Model placed, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
