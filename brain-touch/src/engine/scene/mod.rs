//! Scene entities: the placed brain model, the target marker and the viewer camera.

/// Native viewer camera and its fly controller.
pub mod camera;

/// Brain model placement in front of the controller.
pub mod model;

/// Green target marker and the optional collider gizmo.
pub mod target_marker;
