use bevy::prelude::*;

use super::events::InputEvent;
use crate::engine::scene::model::BrainModel;
use crate::game::settings::{DragMode, GameSettings};
use constants::placement::{DRAG_MOVE_SENSITIVITY, DRAG_ROTATE_SENSITIVITY};

#[derive(Resource, Default, Debug)]
pub struct DragState {
    last_position: Option<Vec2>,
}

impl DragState {
    pub fn begin(&mut self, position: Vec2) {
        self.last_position = Some(position);
    }

    /// Screen-space delta since the previous drag position, if a drag is live.
    pub fn advance(&mut self, position: Vec2) -> Option<Vec2> {
        let last = self.last_position.replace(position)?;
        Some(position - last)
    }

    pub fn end(&mut self) {
        self.last_position = None;
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.last_position.is_some()
    }
}

/// Applies one drag step to the model. Screen x/y map onto the viewer's
/// right/up axes; rotation pivots around the model's visual centre.
pub fn apply_drag(
    transform: &mut Transform,
    mode: DragMode,
    delta: Vec2,
    view_rotation: Quat,
    pivot: Vec3,
) {
    let right = view_rotation * Vec3::X;
    let up = view_rotation * Vec3::Y;

    match mode {
        DragMode::Move => {
            // Screen y grows downwards.
            transform.translation += (right * delta.x - up * delta.y) * DRAG_MOVE_SENSITIVITY;
        }
        DragMode::Rotate => {
            let rotation = Quat::from_axis_angle(Vec3::Y, delta.x * DRAG_ROTATE_SENSITIVITY)
                * Quat::from_axis_angle(right, delta.y * DRAG_ROTATE_SENSITIVITY);
            transform.rotate_around(pivot, rotation);
        }
    }
}

pub fn handle_drag_input(
    mut inputs: EventReader<InputEvent>,
    mut drag: ResMut<DragState>,
    settings: Res<GameSettings>,
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut models: Query<(&mut Transform, &BrainModel)>,
) {
    let view_rotation = cameras
        .single()
        .map(|camera| camera.compute_transform().rotation)
        .unwrap_or(Quat::IDENTITY);

    for input in inputs.read() {
        match *input {
            InputEvent::DragStart(position) => drag.begin(position),
            InputEvent::DragMove(position) => {
                let Some(delta) = drag.advance(position) else {
                    continue;
                };
                for (mut transform, model) in &mut models {
                    let pivot = transform.transform_point(model.local_center);
                    apply_drag(&mut transform, settings.drag_mode, delta, view_rotation, pivot);
                }
            }
            InputEvent::DragEnd => drag.end(),
            InputEvent::Select => {}
        }
    }
}
