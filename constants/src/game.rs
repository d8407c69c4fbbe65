/// Length of one play session in seconds.
pub const SESSION_DURATION_SECS: u32 = 60;

/// Radius of the invisible collision sphere around the target point.
pub const TARGET_HIT_RADIUS: f32 = 0.15;

/// Countdown timer period in seconds.
pub const TICK_INTERVAL_SECS: f32 = 1.0;

/// Furthest distance along the controller ray at which a target can be touched.
pub const TOUCH_REACH: f32 = 2.0;

/// Haptic pulse sent to the controller on every scored touch.
pub const HAPTIC_INTENSITY: f32 = 0.6;
pub const HAPTIC_DURATION_MS: u32 = 100;
