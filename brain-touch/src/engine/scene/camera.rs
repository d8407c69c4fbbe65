#[cfg(not(target_arch = "wasm32"))]
use bevy::input::mouse::MouseMotion;
use bevy::math::EulerRot;
use bevy::prelude::*;
use constants::placement::{VIEWER_LOOK_AT, VIEWER_START_POSITION};

/// Desktop viewer: eye height position looking at the play area. On the web
/// the host page owns the XR view and this camera only renders the canvas.
#[derive(Resource)]
pub struct ViewerCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for ViewerCamera {
    fn default() -> Self {
        let start = Transform::from_translation(Vec3::from_array(VIEWER_START_POSITION))
            .looking_at(Vec3::from_array(VIEWER_LOOK_AT), Vec3::Y);
        let (yaw, pitch, _) = start.rotation.to_euler(EulerRot::YXZ);
        Self {
            position: start.translation,
            yaw,
            pitch,
        }
    }
}

impl ViewerCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation())
    }
}

pub fn spawn_viewer_camera(mut commands: Commands) {
    let viewer = ViewerCamera::default();
    commands.spawn((Camera3d::default(), viewer.transform()));
    commands.insert_resource(viewer);
}

/// Middle mouse looks around, WASD/QE flies. Left and right buttons are
/// taken by select and drag.
#[cfg(not(target_arch = "wasm32"))]
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewer: ResMut<ViewerCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Middle) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewer.yaw -= mouse_delta.x * yaw_sens;
        viewer.pitch = (viewer.pitch - mouse_delta.y * pitch_sens).clamp(-1.55, 1.55);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyS) { move_input.z += 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyE) { move_input.y += 1.0; } // Up
    if keyboard.pressed(KeyCode::KeyQ) { move_input.y -= 1.0; } // Down

    if move_input != Vec3::ZERO {
        let view_rot = viewer.rotation();
        let forward = view_rot * Vec3::Z;
        let right = view_rot * Vec3::X;

        // Shift = faster
        let mut speed = 1.5;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.0;
        }

        let world_delta = right * move_input.x + Vec3::Y * move_input.y + forward * move_input.z;
        viewer.position += world_delta.normalize() * speed * time.delta_secs();
    }

    *camera_transform = viewer.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_starts_at_eye_height_facing_the_play_area() {
        let viewer = ViewerCamera::default();
        let transform = viewer.transform();

        assert!((transform.translation - Vec3::new(0.0, 1.6, 3.0)).length() < 1e-5);
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }
}
