//! Bevy-side engine: application setup, asset loading, point cloud data,
//! rendering material and scene entities.

/// Core application setup and state management.
pub mod core;

/// Asynchronous settings and model loading.
pub mod loading;

/// Point cloud data, bounds and sprite mesh construction.
pub mod point_cloud;

/// Scene entities driven by the game session.
pub mod scene;

/// Point sprite material.
pub mod shaders;
