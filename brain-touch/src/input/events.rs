use bevy::prelude::*;

/// Player input, independent of whether it came from the host page or the mouse.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Controller trigger or tap.
    Select,
    /// Touch/drag positions are in screen pixels.
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd,
}

/// Lifecycle of the host XR session.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrLifecycleEvent {
    SessionStarted { haptics: bool },
    SessionEnded,
}
