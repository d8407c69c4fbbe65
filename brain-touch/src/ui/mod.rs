//! Native-only overlays. On the web the host page renders score and time
//! from RPC notifications.

/// Score, time, status and FPS text.
pub mod hud;
