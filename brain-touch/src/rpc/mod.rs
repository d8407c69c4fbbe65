//! JSON-RPC 2.0 bridge to the host web page.
//!
//! The wasm build runs inside a page that owns the WebXR session. The page
//! forwards controller poses, selects, touch drags and session lifecycle to
//! the game via postMessage, and receives score, time and haptic requests
//! back as notifications.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ xr_pose / select / drag_* ──────────> │ InputEvent, ControllerPose
//!        ├─ xr_session_start / _end ────────────> │ XrLifecycleEvent
//!        ├─ Request (with ID) ──────────────────> │
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <── score_update / time_update / ... ──┤ SessionChanged
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! Errors are returned to requests; rejected notifications are only logged.
//!
//! ## Methods
//!
//! ### Requests
//! - `get_session_state`: phase, score, remaining time and current target
//! - `end_session`: force the running game to end
//! - `get_fps`: current frame rate
//!
//! ### Inbound notifications
//! - `xr_pose`: `{ position: [x, y, z], orientation: [x, y, z, w] }`
//! - `select`, `drag_start` / `drag_move` (`{ x, y }` in pixels), `drag_end`
//! - `xr_session_start` (`{ haptics: bool }`), `xr_session_end`
//!
//! ### Outbound notifications
//! - `session_state_changed`, `score_update`, `time_update`
//! - `haptic_pulse`: `{ intensity, duration_ms }`
//! - `model_load_failed`: `{ path, reason }`
//! - `fps_update`

/// Typed parsing of inbound host messages.
pub mod host_message;

/// Session change and FPS notifications to the host.
pub mod notifications;

/// Transport, queues and request dispatch.
pub mod web_rpc;
