//! Controller pose, select/drag input and XR lifecycle.
//!
//! Inputs arrive from two places: the host page over JSON-RPC (WebXR pose,
//! select, touch drags, session start/end) and, for desktop play, the mouse
//! and cursor. Both end up as the same `InputEvent`s and `ControllerPose`.

/// Drag-to-move and drag-to-rotate manipulation of the placed model.
pub mod drag;

/// Input and lifecycle event types.
pub mod events;

/// Best-effort haptic feedback.
pub mod haptics;

/// Mouse and window emulation of the XR controller (native only).
#[cfg(not(target_arch = "wasm32"))]
pub mod mouse;

/// Controller pose resource and the cursor ray fallback.
pub mod pose;

use bevy::prelude::*;

use crate::game::GameSet;
use drag::{DragState, handle_drag_input};
use events::{InputEvent, XrLifecycleEvent};
use haptics::{HapticPulse, HapticSupport, deliver_haptic_pulses, track_haptic_support};
use pose::{ControllerPose, update_cursor_pose};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerPose>()
            .init_resource::<DragState>()
            .init_resource::<HapticSupport>()
            .add_event::<InputEvent>()
            .add_event::<XrLifecycleEvent>()
            .add_event::<HapticPulse>()
            .add_systems(
                Update,
                (update_cursor_pose, track_haptic_support).in_set(GameSet::Input),
            )
            .add_systems(
                Update,
                handle_drag_input
                    .after(GameSet::Input)
                    .before(GameSet::Simulation),
            )
            .add_systems(Update, deliver_haptic_pulses.in_set(GameSet::Presentation));

        // Mouse emulation only for native builds; the web build is driven by the host page.
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(
                Update,
                (mouse::emit_mouse_input, mouse::end_session_on_window_close)
                    .in_set(GameSet::Input),
            );
        }
    }
}
