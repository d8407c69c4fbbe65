/// Brain model, relative to the asset root.
pub const MODEL_PATH: &str = "models/Brain.glb";

/// Optional runtime overrides for the game settings.
pub const SETTINGS_PATH: &str = "config/game.settings.json";

pub const POINT_SPRITE_SHADER_PATH: &str = "shaders/point_sprite.wgsl";
