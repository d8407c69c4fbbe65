use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::host_message::{HostMessage, parse_host_message};
use crate::game::GameSet;
use crate::game::events::GameEvent;
use crate::game::session::GameSession;
use crate::input::events::{InputEvent, XrLifecycleEvent};
use crate::input::pose::{ControllerPose, PoseSource};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure. Requests without an `id` are notifications.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outbound message queues to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
    host_seen: bool,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Whether a host page has sent at least one well-formed message.
    pub fn host_connected(&self) -> bool {
        self.host_seen
    }

    pub fn mark_host_seen(&mut self) {
        self.host_seen = true;
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> usize {
        self.outgoing_notifications.len()
    }

    #[cfg(test)]
    pub fn take_notifications(&mut self) -> Vec<RpcNotification> {
        std::mem::take(&mut self.outgoing_notifications)
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge to the embedding page.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .before(GameSet::Input),
            )
            .add_systems(Update, send_outgoing_messages.after(GameSet::Presentation));

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let registered = window().map(|window| {
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    });
    match registered {
        Some(Ok(())) => {}
        Some(Err(e)) => error!("Failed to register message listener: {:?}", e),
        None => error!("Window object not available"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw inbound message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Where host messages end up inside the app.
#[derive(SystemParam)]
struct HostChannels<'w> {
    session: Res<'w, GameSession>,
    diagnostics: Res<'w, DiagnosticsStore>,
    pose: ResMut<'w, ControllerPose>,
    inputs: EventWriter<'w, InputEvent>,
    lifecycle: EventWriter<'w, XrLifecycleEvent>,
    game_events: EventWriter<'w, GameEvent>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut channels: HostChannels,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                continue;
            }
        };
        rpc_interface.mark_host_seen();

        let result = parse_host_message(&request)
            .and_then(|message| apply_host_message(message, &mut channels));

        match (request.id, result) {
            (Some(id), Ok(result_value)) => rpc_interface.queue_response(RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: Some(result_value),
                error: None,
                id: Some(id),
            }),
            (Some(id), Err(error)) => {
                rpc_interface.queue_response(create_error_response(id, error))
            }
            (None, Ok(_)) => {}
            (None, Err(error)) => {
                warn!("Rejected RPC notification {}: {}", request.method, error.message)
            }
        }
    }
}

/// Route one host message. The returned value is the response body for requests.
fn apply_host_message(
    message: HostMessage,
    channels: &mut HostChannels,
) -> Result<serde_json::Value, RpcError> {
    match message {
        HostMessage::GetSessionState => serde_json::to_value(channels.session.snapshot())
            .map_err(|e| RpcError::internal_error(&e.to_string())),
        HostMessage::EndSession => {
            channels.game_events.write(GameEvent::ExternalEnd);
            info!("Session end requested by host");
            Ok(serde_json::json!({ "success": true }))
        }
        HostMessage::GetFps => handle_get_fps(&channels.diagnostics),
        HostMessage::XrPose {
            position,
            orientation,
        } => {
            let accepted = channels
                .pose
                .update(position, orientation, PoseSource::Host);
            Ok(serde_json::json!({ "accepted": accepted }))
        }
        HostMessage::Select => {
            channels.inputs.write(InputEvent::Select);
            Ok(serde_json::json!({ "success": true }))
        }
        HostMessage::DragStart(position) => {
            channels.inputs.write(InputEvent::DragStart(position));
            Ok(serde_json::json!({ "success": true }))
        }
        HostMessage::DragMove(position) => {
            channels.inputs.write(InputEvent::DragMove(position));
            Ok(serde_json::json!({ "success": true }))
        }
        HostMessage::DragEnd => {
            channels.inputs.write(InputEvent::DragEnd);
            Ok(serde_json::json!({ "success": true }))
        }
        HostMessage::XrSessionStart { haptics } => {
            channels
                .lifecycle
                .write(XrLifecycleEvent::SessionStarted { haptics });
            info!("Host XR session started (haptics: {})", haptics);
            Ok(serde_json::json!({ "success": true }))
        }
        HostMessage::XrSessionEnd => {
            channels.lifecycle.write(XrLifecycleEvent::SessionEnded);
            info!("Host XR session ended");
            Ok(serde_json::json!({ "success": true }))
        }
    }
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

fn create_error_response(id: serde_json::Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: -32600,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::SessionPhase;

    fn rpc_app() -> App {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .init_resource::<GameSession>()
            .init_resource::<DiagnosticsStore>()
            .init_resource::<ControllerPose>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<InputEvent>()
            .add_event::<XrLifecycleEvent>()
            .add_event::<GameEvent>()
            .add_systems(Update, handle_rpc_messages);
        app
    }

    fn deliver(app: &mut App, content: serde_json::Value) {
        app.world_mut().send_event(IncomingRpcMessage {
            content: content.to_string(),
        });
        app.update();
    }

    fn responses(app: &mut App) -> Vec<RpcResponse> {
        std::mem::take(
            &mut app
                .world_mut()
                .resource_mut::<WebRpcInterface>()
                .outgoing_responses,
        )
    }

    #[test]
    fn session_state_request_gets_a_snapshot() {
        let mut app = rpc_app();
        deliver(
            &mut app,
            serde_json::json!({ "jsonrpc": "2.0", "method": "get_session_state", "id": 7 }),
        );

        let responses = responses(&mut app);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, Some(serde_json::json!(7)));
        let result = responses[0].result.as_ref().unwrap();
        assert_eq!(result["phase"], "idle");
        assert_eq!(result["score"], 0);
        assert_eq!(result["remaining_secs"], 60);
        assert!(app.world().resource::<WebRpcInterface>().host_connected());
    }

    #[test]
    fn pose_notification_drives_the_controller() {
        let mut app = rpc_app();
        deliver(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "xr_pose",
                "params": { "position": [0.0, 1.5, 0.0], "orientation": [0.0, 0.0, 0.0, 1.0] }
            }),
        );

        let pose = app.world().resource::<ControllerPose>();
        assert_eq!(pose.source(), Some(PoseSource::Host));
        assert_eq!(pose.transform().unwrap().translation, Vec3::new(0.0, 1.5, 0.0));
        assert!(responses(&mut app).is_empty());
    }

    #[test]
    fn end_session_request_dispatches_external_end() {
        let mut app = rpc_app();
        deliver(
            &mut app,
            serde_json::json!({ "jsonrpc": "2.0", "method": "end_session", "id": "end" }),
        );

        let events = app.world().resource::<Events<GameEvent>>();
        let mut cursor = events.get_cursor();
        let written: Vec<_> = cursor.read(events).copied().collect();
        assert_eq!(written, vec![GameEvent::ExternalEnd]);
        assert_eq!(
            app.world().resource::<GameSession>().phase(),
            SessionPhase::Idle
        );
    }

    #[test]
    fn unknown_method_request_gets_error_response() {
        let mut app = rpc_app();
        deliver(
            &mut app,
            serde_json::json!({ "jsonrpc": "2.0", "method": "unknown_method", "id": 1 }),
        );

        let responses = responses(&mut app);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].error.as_ref().map(|e| e.code), Some(-32601));
    }

    #[test]
    fn garbage_is_ignored() {
        let mut app = rpc_app();
        app.world_mut().send_event(IncomingRpcMessage {
            content: "{\"jsonrpc\": ".to_string(),
        });
        app.update();

        assert!(responses(&mut app).is_empty());
        assert!(!app.world().resource::<WebRpcInterface>().host_connected());
    }
}
