use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::game::hit::ControllerRay;

/// Who is currently driving the controller pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseSource {
    /// Camera ray through the mouse cursor.
    Cursor,
    /// Pose forwarded by the host page from the XR input source.
    Host,
}

/// Latest controller pose. The ray points along the pose's local -Z.
#[derive(Resource, Debug, Default)]
pub struct ControllerPose {
    pose: Option<(Vec3, Quat)>,
    source: Option<PoseSource>,
}

impl ControllerPose {
    /// Records a new pose. Once the host has sent a pose it owns the
    /// controller and cursor updates are dropped. Returns whether the pose changed.
    pub fn update(&mut self, origin: Vec3, rotation: Quat, source: PoseSource) -> bool {
        if source == PoseSource::Cursor && self.source == Some(PoseSource::Host) {
            return false;
        }
        if !origin.is_finite() || !rotation.is_finite() {
            return false;
        }

        self.pose = Some((origin, rotation.normalize()));
        self.source = Some(source);
        true
    }

    pub fn source(&self) -> Option<PoseSource> {
        self.source
    }

    pub fn transform(&self) -> Option<Transform> {
        self.pose
            .map(|(origin, rotation)| Transform::from_translation(origin).with_rotation(rotation))
    }

    pub fn ray(&self, reach: f32) -> Option<ControllerRay> {
        let (origin, rotation) = self.pose?;
        ControllerRay::new(origin, rotation * Vec3::NEG_Z, reach)
    }
}

/// Native stand-in for the XR controller: the ray from the camera through the cursor.
pub fn update_cursor_pose(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut pose: ResMut<ControllerPose>,
) {
    if pose.source() == Some(PoseSource::Host) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, ray.direction.as_vec3());
    pose.update(ray.origin, rotation, PoseSource::Cursor);
}
