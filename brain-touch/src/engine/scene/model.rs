use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::placement::{PLACEMENT_DISTANCE, VIEWER_LOOK_AT, VIEWER_START_POSITION, fit_scale};
use constants::render_settings::{BRAIN_POINT_COLOUR, BRAIN_POINT_SIZE};

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::point_cloud::{PointCloudBounds, create_point_sprite_mesh};
use crate::engine::shaders::PointSpriteMaterial;
use crate::game::events::GameEvent;
use crate::game::session::GameSession;
use crate::input::events::InputEvent;
use crate::input::pose::ControllerPose;

/// The placed brain point cloud. `local_center` is the bounds centre in
/// model space, used as the rotation pivot for drags.
#[derive(Component, Debug, Clone, Copy)]
pub struct BrainModel {
    pub local_center: Vec3,
}

/// Placement for a model with `bounds`, put `PLACEMENT_DISTANCE` ahead of
/// `pose` along its forward axis. The model is oriented like the pose,
/// scaled to the fit extent and centred on the anchor point.
pub fn model_placement(pose: &Transform, bounds: &PointCloudBounds) -> Transform {
    let anchor = pose.translation + pose.forward() * PLACEMENT_DISTANCE;
    let scale = fit_scale(bounds.max_extent());
    let rotation = pose.rotation;

    Transform {
        translation: anchor - rotation * (bounds.center() * scale),
        rotation,
        scale: Vec3::splat(scale),
    }
}

fn default_viewer_pose() -> Transform {
    Transform::from_translation(Vec3::from_array(VIEWER_START_POSITION))
        .looking_at(Vec3::from_array(VIEWER_LOOK_AT), Vec3::Y)
}

/// The first select after loading places the model and starts the game.
pub fn place_brain_model(
    mut commands: Commands,
    mut inputs: EventReader<InputEvent>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut session: ResMut<GameSession>,
    pose: Res<ControllerPose>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointSpriteMaterial>>,
    mut game_events: EventWriter<GameEvent>,
) {
    let selected = inputs
        .read()
        .filter(|input| matches!(input, InputEvent::Select))
        .count()
        > 0;
    if !selected || loading_progress.model_placed {
        return;
    }
    let Some(cloud) = session.point_cloud() else {
        return;
    };

    let bounds = cloud.bounds();
    let placement = model_placement(&pose.transform().unwrap_or_else(default_viewer_pose), &bounds);
    let mesh = meshes.add(create_point_sprite_mesh(cloud.positions()));

    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(materials.add(PointSpriteMaterial::new(
            BRAIN_POINT_COLOUR,
            BRAIN_POINT_SIZE,
        ))),
        placement,
        NoFrustumCulling,
        BrainModel {
            local_center: bounds.center(),
        },
        Name::new("Brain"),
    ));

    session.follow_model(placement);
    game_events.write(GameEvent::Start);
    loading_progress.model_placed = true;
    info!(
        "Brain placed at {:?} (scale {:.3})",
        placement.translation, placement.scale.x
    );
}

/// Keeps the session's view of the model placement current after drags.
pub fn sync_model_to_session(
    models: Query<&Transform, (With<BrainModel>, Changed<Transform>)>,
    mut session: ResMut<GameSession>,
) {
    for transform in &models {
        session.follow_model(*transform);
    }
}
