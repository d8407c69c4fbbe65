use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub settings_resolved: bool,
    pub model_requested: bool,
    pub point_cloud_created: bool,
    pub model_placed: bool,
    pub failure: Option<String>,
}
