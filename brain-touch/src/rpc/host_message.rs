use bevy::prelude::*;
use serde::Deserialize;

use super::web_rpc::{RpcError, RpcRequest};

/// Everything the host page can tell the game, parsed from JSON-RPC.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    GetSessionState,
    EndSession,
    GetFps,
    XrPose { position: Vec3, orientation: Quat },
    Select,
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd,
    XrSessionStart { haptics: bool },
    XrSessionEnd,
}

#[derive(Deserialize)]
struct PoseParams {
    position: [f32; 3],
    orientation: [f32; 4],
}

#[derive(Deserialize)]
struct PointerParams {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SessionStartParams {
    haptics: bool,
}

fn params<T: for<'de> Deserialize<'de>>(
    params: &serde_json::Value,
    expected: &str,
) -> Result<T, RpcError> {
    serde_json::from_value(params.clone()).map_err(|_| RpcError::invalid_params(expected))
}

fn pointer(value: &serde_json::Value) -> Result<Vec2, RpcError> {
    let p: PointerParams = params(value, "Expected 'x' and 'y' parameters")?;
    Ok(Vec2::new(p.x, p.y))
}

pub fn parse_host_message(request: &RpcRequest) -> Result<HostMessage, RpcError> {
    if request.jsonrpc != "2.0" {
        return Err(RpcError::invalid_request("Expected jsonrpc 2.0"));
    }

    match request.method.as_str() {
        "get_session_state" => Ok(HostMessage::GetSessionState),
        "end_session" => Ok(HostMessage::EndSession),
        "get_fps" => Ok(HostMessage::GetFps),
        "xr_pose" => {
            let pose: PoseParams = params(
                &request.params,
                "Expected 'position' [x, y, z] and 'orientation' [x, y, z, w]",
            )?;
            let position = Vec3::from_array(pose.position);
            let orientation = Quat::from_array(pose.orientation);
            if !position.is_finite() || !orientation.is_finite() || orientation.length() < 1e-6 {
                return Err(RpcError::invalid_params(
                    "Pose must be finite with a non-zero orientation",
                ));
            }
            Ok(HostMessage::XrPose {
                position,
                orientation: orientation.normalize(),
            })
        }
        "select" => Ok(HostMessage::Select),
        "drag_start" => pointer(&request.params).map(HostMessage::DragStart),
        "drag_move" => pointer(&request.params).map(HostMessage::DragMove),
        "drag_end" => Ok(HostMessage::DragEnd),
        "xr_session_start" => {
            let start: SessionStartParams = if request.params.is_null() {
                SessionStartParams::default()
            } else {
                params(&request.params, "Expected optional 'haptics' boolean")?
            };
            Ok(HostMessage::XrSessionStart {
                haptics: start.haptics,
            })
        }
        "xr_session_end" => Ok(HostMessage::XrSessionEnd),
        _ => Err(RpcError::method_not_found(&request.method)),
    }
}
