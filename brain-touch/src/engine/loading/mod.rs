//! Asset loading for the game: runtime settings first, then the brain model
//! and the point cloud extracted from it, with progress tracking.

/// Brain model (GLTF) loading and point cloud extraction.
///
/// Failures are terminal and reported to the host page.
pub mod model_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;

/// Optional JSON settings override; falls back to defaults when absent.
pub mod settings_loader;
