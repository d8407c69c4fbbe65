use bevy::prelude::*;
use thiserror::Error;

use super::events::XrLifecycleEvent;
use crate::rpc::web_rpc::WebRpcInterface;

/// Request for a short vibration on the controller that scored.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    pub intensity: f32,
    pub duration_ms: u32,
}

/// Whether the input device can vibrate. Hosts announce support when the
/// XR session starts.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HapticSupport {
    #[default]
    Unsupported,
    Host,
}

#[derive(Debug, Error, PartialEq)]
pub enum HapticError {
    #[error("pulse intensity {0} is outside [0, 1]")]
    InvalidIntensity(f32),
    #[error("no host page is connected")]
    HostUnavailable,
}

/// Delivers a pulse through whatever the device supports. A device without
/// haptics accepts and drops every pulse.
pub fn deliver_pulse(
    support: HapticSupport,
    pulse: &HapticPulse,
    rpc: &mut WebRpcInterface,
) -> Result<(), HapticError> {
    match support {
        HapticSupport::Unsupported => Ok(()),
        HapticSupport::Host => {
            if !(0.0..=1.0).contains(&pulse.intensity) {
                return Err(HapticError::InvalidIntensity(pulse.intensity));
            }
            if !rpc.host_connected() {
                return Err(HapticError::HostUnavailable);
            }
            rpc.send_notification(
                "haptic_pulse",
                serde_json::json!({
                    "intensity": pulse.intensity,
                    "duration_ms": pulse.duration_ms
                }),
            );
            Ok(())
        }
    }
}

/// Fire-and-forget: failures are cosmetic and only logged.
pub fn deliver_haptic_pulses(
    mut pulses: EventReader<HapticPulse>,
    support: Res<HapticSupport>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for pulse in pulses.read() {
        if let Err(e) = deliver_pulse(*support, pulse, &mut rpc) {
            debug!("Haptic pulse dropped: {}", e);
        }
    }
}

pub fn track_haptic_support(
    mut lifecycle: EventReader<XrLifecycleEvent>,
    mut support: ResMut<HapticSupport>,
) {
    for event in lifecycle.read() {
        *support = match event {
            XrLifecycleEvent::SessionStarted { haptics: true } => HapticSupport::Host,
            XrLifecycleEvent::SessionStarted { haptics: false }
            | XrLifecycleEvent::SessionEnded => HapticSupport::Unsupported,
        };
    }
}
