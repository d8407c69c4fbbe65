//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the point sprite material, asset loading
/// systems, the game and input plugins, and platform-specific configuration.
pub mod app_setup;

/// Application state machine and loading progress transitions.
///
/// Moves from model loading through placement to the running game, or to a
/// terminal failure state when the model cannot be used.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
