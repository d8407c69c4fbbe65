use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use super::web_rpc::WebRpcInterface;
use crate::game::events::SessionChanged;
use crate::game::session::SessionTransition;

const FPS_NOTIFICATION_INTERVAL_SECS: f32 = 0.5;

/// Host notifications for one session change.
pub fn notifications_for(change: &SessionChanged) -> Vec<(&'static str, serde_json::Value)> {
    let state = || {
        (
            "session_state_changed",
            serde_json::json!({
                "phase": change.phase,
                "score": change.score,
                "remaining_secs": change.remaining_secs
            }),
        )
    };
    let score = || ("score_update", serde_json::json!({ "score": change.score }));
    let time = || {
        (
            "time_update",
            serde_json::json!({ "remaining_secs": change.remaining_secs }),
        )
    };

    match change.transition {
        SessionTransition::Started => vec![state(), score(), time()],
        SessionTransition::Scored { .. } => vec![score()],
        SessionTransition::Ticked { .. } => vec![time()],
        SessionTransition::Ended(reason) => {
            let (method, mut params) = state();
            params["reason"] = serde_json::json!(reason);
            vec![(method, params), time()]
        }
        SessionTransition::Ignored => Vec::new(),
    }
}

pub fn publish_session_changes(
    mut changes: EventReader<SessionChanged>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for change in changes.read() {
        for (method, params) in notifications_for(change) {
            rpc_interface.send_notification(method, params);
        }
    }
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFICATION_INTERVAL_SECS {
        return;
    }

    if let Some(value) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    {
        rpc_interface.send_notification(
            "fps_update",
            serde_json::json!({
                "fps": value as f32
            }),
        );
        *last_send_time = current_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::{EndReason, SessionPhase};

    fn change(
        transition: SessionTransition,
        phase: SessionPhase,
        score: u32,
        remaining_secs: u32,
    ) -> SessionChanged {
        SessionChanged {
            transition,
            phase,
            score,
            remaining_secs,
        }
    }

    #[test]
    fn start_announces_full_state() {
        let started = change(SessionTransition::Started, SessionPhase::Active, 0, 60);
        let methods: Vec<_> = notifications_for(&started)
            .into_iter()
            .map(|(method, _)| method)
            .collect();
        assert_eq!(methods, vec!["session_state_changed", "score_update", "time_update"]);
    }

    #[test]
    fn tick_only_updates_time() {
        let notifications = notifications_for(&change(
            SessionTransition::Ticked { remaining_secs: 41 },
            SessionPhase::Active,
            3,
            41,
        ));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].0, "time_update");
        assert_eq!(notifications[0].1["remaining_secs"], 41);
    }

    #[test]
    fn end_carries_reason_and_final_score() {
        let notifications = notifications_for(&change(
            SessionTransition::Ended(EndReason::TimeUp),
            SessionPhase::Ended,
            12,
            0,
        ));
        let (method, params) = &notifications[0];
        assert_eq!(*method, "session_state_changed");
        assert_eq!(params["phase"], "ended");
        assert_eq!(params["score"], 12);
        assert_eq!(params["reason"], "time_up");
    }

    #[test]
    fn ignored_events_are_silent() {
        let ignored = change(SessionTransition::Ignored, SessionPhase::Idle, 0, 60);
        assert!(notifications_for(&ignored).is_empty());
    }

    #[test]
    fn published_changes_reach_the_outbox() {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .add_event::<SessionChanged>()
            .add_systems(Update, publish_session_changes);
        app.world_mut().send_event(change(
            SessionTransition::Scored { score: 1 },
            SessionPhase::Active,
            1,
            55,
        ));
        app.update();

        let sent = app.world_mut().resource_mut::<WebRpcInterface>().take_notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "score_update");
        assert_eq!(sent[0].params["score"], 1);
    }
}
