use bevy::color::Color;

/// World-space size of a brain point sprite.
pub const BRAIN_POINT_SIZE: f32 = 0.05;

/// Hot pink, #FF69B4.
pub const BRAIN_POINT_COLOUR: Color = Color::srgb(1.0, 0.412, 0.706);

/// World-space size of the target marker sprite.
pub const TARGET_POINT_SIZE: f32 = 0.15;

/// Translucent green, #00FF00 at 80% opacity.
pub const TARGET_POINT_COLOUR: Color = Color::srgba(0.0, 1.0, 0.0, 0.8);

/// Debug colour for the collision sphere gizmo.
pub const COLLIDER_GIZMO_COLOUR: Color = Color::srgba(1.0, 1.0, 0.0, 0.5);

pub const HUD_FONT_SIZE: f32 = 16.0;
