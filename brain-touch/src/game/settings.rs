use bevy::prelude::*;
use constants::game::{
    HAPTIC_DURATION_MS, HAPTIC_INTENSITY, SESSION_DURATION_SECS, TARGET_HIT_RADIUS, TOUCH_REACH,
};
use constants::path::MODEL_PATH;
use serde::{Deserialize, Serialize};

/// Where the target sits when the model moves after the target was chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAnchor {
    /// Marker and collider follow the model's current placement every frame.
    #[default]
    FollowModel,
    /// Marker and collider stay where the model was when the target was chosen.
    FixedAtSelection,
}

/// What a drag gesture does to the placed model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    #[default]
    Move,
    Rotate,
}

/// Runtime tunables. Defaults come from the `constants` crate and may be
/// overridden by `config/game.settings.json`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Asset, TypePath)]
#[serde(default)]
pub struct GameSettings {
    pub session_duration_secs: u32,
    pub hit_radius: f32,
    pub touch_reach: f32,
    pub target_anchor: TargetAnchor,
    pub drag_mode: DragMode,
    pub model_path: String,
    pub haptic_intensity: f32,
    pub haptic_duration_ms: u32,
    pub show_collider: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            session_duration_secs: SESSION_DURATION_SECS,
            hit_radius: TARGET_HIT_RADIUS,
            touch_reach: TOUCH_REACH,
            target_anchor: TargetAnchor::default(),
            drag_mode: DragMode::default(),
            model_path: MODEL_PATH.to_string(),
            haptic_intensity: HAPTIC_INTENSITY,
            haptic_duration_ms: HAPTIC_DURATION_MS,
            show_collider: false,
        }
    }
}

impl GameSettings {
    /// Replaces values that would break the game loop with their defaults.
    pub fn sanitised(mut self) -> Self {
        let defaults = Self::default();

        if self.session_duration_secs == 0 {
            warn!(
                "session_duration_secs must be positive, using {}",
                defaults.session_duration_secs
            );
            self.session_duration_secs = defaults.session_duration_secs;
        }
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            warn!("hit_radius must be positive, using {}", defaults.hit_radius);
            self.hit_radius = defaults.hit_radius;
        }
        if !(self.touch_reach.is_finite() && self.touch_reach > 0.0) {
            warn!("touch_reach must be positive, using {}", defaults.touch_reach);
            self.touch_reach = defaults.touch_reach;
        }
        if self.model_path.trim().is_empty() {
            self.model_path = defaults.model_path;
        }
        self.haptic_intensity = if self.haptic_intensity.is_finite() {
            self.haptic_intensity.clamp(0.0, 1.0)
        } else {
            defaults.haptic_intensity
        };

        self
    }
}
