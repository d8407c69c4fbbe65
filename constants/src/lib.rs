pub mod game;
pub mod path;
pub mod placement;
pub mod render_settings;
