use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowCloseRequested};

use super::events::{InputEvent, XrLifecycleEvent};

/// Mouse emulation of the XR controller: left click selects, right button drags.
pub fn emit_mouse_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut inputs: EventWriter<InputEvent>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        inputs.write(InputEvent::Select);
    }

    let cursor = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position());

    if let Some(position) = cursor {
        if mouse_button.just_pressed(MouseButton::Right) {
            inputs.write(InputEvent::DragStart(position));
        } else if mouse_button.pressed(MouseButton::Right) {
            inputs.write(InputEvent::DragMove(position));
        }
    }

    if mouse_button.just_released(MouseButton::Right) {
        inputs.write(InputEvent::DragEnd);
    }
}

/// Closing the window tears the session down like a disconnected headset.
pub fn end_session_on_window_close(
    mut close_requests: EventReader<WindowCloseRequested>,
    mut lifecycle: EventWriter<XrLifecycleEvent>,
) {
    if close_requests.read().count() > 0 {
        lifecycle.write(XrLifecycleEvent::SessionEnded);
    }
}
