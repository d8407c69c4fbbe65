use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{COLLIDER_GIZMO_COLOUR, TARGET_POINT_COLOUR, TARGET_POINT_SIZE};

use crate::engine::point_cloud::create_point_sprite_mesh;
use crate::engine::shaders::PointSpriteMaterial;
use crate::game::session::GameSession;
use crate::game::settings::GameSettings;

/// Visible green point over the current target. The collider itself is
/// never rendered; it lives only in the session's hit test.
#[derive(Component)]
pub struct TargetMarker;

pub fn spawn_target_marker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointSpriteMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(create_point_sprite_mesh(&[Vec3::ZERO]))),
        MeshMaterial3d(materials.add(PointSpriteMaterial::new(
            TARGET_POINT_COLOUR,
            TARGET_POINT_SIZE,
        ))),
        Transform::default(),
        Visibility::Hidden,
        NoFrustumCulling,
        TargetMarker,
        Name::new("Target marker"),
    ));
}

/// Mirrors the session target onto the marker. Hidden unless a run is active.
pub fn sync_target_marker(
    session: Res<GameSession>,
    mut markers: Query<(&mut Transform, &mut Visibility), With<TargetMarker>>,
) {
    let target = session.current_target().filter(|_| session.active());

    for (mut transform, mut visibility) in &mut markers {
        match target {
            Some(target) => {
                transform.translation = target.world_position;
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Debug view of the invisible hit sphere.
pub fn draw_collider_gizmo(
    session: Res<GameSession>,
    settings: Res<GameSettings>,
    mut gizmos: Gizmos,
) {
    if !settings.show_collider || !session.active() {
        return;
    }
    if let Some(target) = session.current_target() {
        gizmos.sphere(
            Isometry3d::from_translation(target.world_position),
            target.hit_radius,
            COLLIDER_GIZMO_COLOUR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::point_cloud::PointCloud;
    use crate::game::settings::TargetAnchor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn marker_app(session: GameSession) -> (App, Entity) {
        let mut app = App::new();
        app.insert_resource(session)
            .add_systems(Update, sync_target_marker);
        let marker = app
            .world_mut()
            .spawn((Transform::default(), Visibility::Hidden, TargetMarker))
            .id();
        (app, marker)
    }

    #[test]
    fn marker_stays_hidden_before_the_game_starts() {
        let (mut app, marker) = marker_app(GameSession::default());
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(marker),
            Some(&Visibility::Hidden)
        );
    }

    #[test]
    fn marker_shows_on_the_target_then_hides_at_the_end() {
        let mut session = GameSession::new(60, 0.15, TargetAnchor::FollowModel);
        session.attach_point_cloud(
            PointCloud::from_positions(vec![Vec3::new(0.0, 0.0, -1.0)]).unwrap(),
        );
        session.follow_model(Transform::from_xyz(0.0, 1.0, 0.0));
        session.start(&mut StdRng::seed_from_u64(1)).unwrap();

        let (mut app, marker) = marker_app(session);
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(marker),
            Some(&Visibility::Visible)
        );
        assert_eq!(
            app.world().get::<Transform>(marker).unwrap().translation,
            Vec3::new(0.0, 1.0, -1.0)
        );

        app.world_mut().resource_mut::<GameSession>().on_external_end();
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(marker),
            Some(&Visibility::Hidden)
        );
    }
}
