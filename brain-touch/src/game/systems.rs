use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::events::{GameEvent, SessionChanged};
use super::session::{GameSession, SessionTransition};
use super::settings::GameSettings;
use crate::input::events::{InputEvent, XrLifecycleEvent};
use crate::input::haptics::HapticPulse;
use crate::input::pose::ControllerPose;
use constants::game::TICK_INTERVAL_SECS;

/// Source of randomness for target selection.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Repeating one-second countdown. Only ticks while a run is active.
#[derive(Resource)]
pub struct TickTimer {
    timer: Timer,
    running: bool,
}

impl Default for TickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(TICK_INTERVAL_SECS, TimerMode::Repeating),
            running: false,
        }
    }
}

impl TickTimer {
    pub fn restart(&mut self) {
        self.timer.reset();
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.timer.reset();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

pub fn tick_session_timer(
    time: Res<Time>,
    mut timer: ResMut<TickTimer>,
    mut events: EventWriter<GameEvent>,
) {
    if !timer.running {
        return;
    }

    timer.timer.tick(time.delta());
    for _ in 0..timer.timer.times_finished_this_tick() {
        events.write(GameEvent::Tick);
    }
}

/// Hit test of the controller ray against the live target, every frame.
pub fn detect_target_touch(
    pose: Res<ControllerPose>,
    session: Res<GameSession>,
    settings: Res<GameSettings>,
    mut events: EventWriter<GameEvent>,
) {
    let Some(ray) = pose.ray(settings.touch_reach) else {
        return;
    };

    if session.is_touching(&ray) {
        events.write(GameEvent::Hit);
    }
}

/// Once the model is placed, a select restarts a finished run.
pub fn restart_on_select(
    mut inputs: EventReader<InputEvent>,
    session: Res<GameSession>,
    mut events: EventWriter<GameEvent>,
) {
    let selected = inputs
        .read()
        .filter(|input| matches!(input, InputEvent::Select))
        .count()
        > 0;

    if selected && session.is_startable() {
        events.write(GameEvent::Start);
    }
}

/// Host session teardown ends the run and stops the countdown.
pub fn end_on_session_teardown(
    mut lifecycle: EventReader<XrLifecycleEvent>,
    mut events: EventWriter<GameEvent>,
) {
    for event in lifecycle.read() {
        if matches!(event, XrLifecycleEvent::SessionEnded) {
            events.write(GameEvent::ExternalEnd);
        }
    }
}

/// Applies queued game events in order: the dispatch table between event
/// delivery and session state.
pub fn dispatch_game_events(
    mut events: EventReader<GameEvent>,
    mut session: ResMut<GameSession>,
    mut rng: ResMut<GameRng>,
    mut timer: ResMut<TickTimer>,
    settings: Res<GameSettings>,
    mut changes: EventWriter<SessionChanged>,
    mut haptics: EventWriter<HapticPulse>,
) {
    for event in events.read() {
        let transition = session.dispatch(*event, &mut rng.0);

        match transition {
            SessionTransition::Ignored => continue,
            SessionTransition::Started => {
                timer.restart();
                info!(
                    "Session started: {}s on the clock, target #{}",
                    session.remaining_secs(),
                    session.current_target().map_or(0, |t| t.index)
                );
            }
            SessionTransition::Scored { score } => {
                haptics.write(HapticPulse {
                    intensity: settings.haptic_intensity,
                    duration_ms: settings.haptic_duration_ms,
                });
                info!("Touched! Score: {}", score);
            }
            SessionTransition::Ticked { .. } => {}
            SessionTransition::Ended(reason) => {
                timer.cancel();
                info!("Session ended ({:?}) with score {}", reason, session.score());
            }
        }

        changes.write(SessionChanged {
            transition,
            phase: session.phase(),
            score: session.score(),
            remaining_secs: session.remaining_secs(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::point_cloud::PointCloud;
    use crate::game::session::{EndReason, SessionPhase};
    use crate::input::pose::PoseSource;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Recorded(Vec<SessionTransition>);

    fn record_changes(mut changes: EventReader<SessionChanged>, mut recorded: ResMut<Recorded>) {
        recorded.0.extend(changes.read().map(|c| c.transition));
    }

    fn game_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)))
            .insert_resource(GameRng(StdRng::seed_from_u64(17)))
            .init_resource::<TickTimer>()
            .init_resource::<GameSettings>()
            .init_resource::<ControllerPose>()
            .init_resource::<Recorded>()
            .add_event::<GameEvent>()
            .add_event::<SessionChanged>()
            .add_event::<HapticPulse>()
            .add_event::<InputEvent>()
            .add_event::<XrLifecycleEvent>()
            .add_systems(
                Update,
                (
                    restart_on_select,
                    end_on_session_teardown,
                    tick_session_timer,
                    detect_target_touch,
                    dispatch_game_events,
                    record_changes,
                )
                    .chain(),
            );

        let mut session = GameSession::default();
        session.attach_point_cloud(
            PointCloud::from_positions(vec![
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(5.0, 0.0, -1.0),
                Vec3::new(-5.0, 0.0, -1.0),
            ])
            .unwrap(),
        );
        app.insert_resource(session);
        app
    }

    #[test]
    fn timer_drives_session_to_the_end() {
        let mut app = game_app();
        app.world_mut().send_event(GameEvent::Start);
        app.update();
        assert!(app.world().resource::<TickTimer>().is_running());

        // 250ms per frame, comfortably more than sixty seconds.
        for _ in 0..(4 * 60 + 20) {
            app.update();
        }

        let session = app.world().resource::<GameSession>();
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.remaining_secs(), 0);
        assert!(!app.world().resource::<TickTimer>().is_running());

        let recorded = &app.world().resource::<Recorded>().0;
        let ended = recorded
            .iter()
            .filter(|t| **t == SessionTransition::Ended(EndReason::TimeUp))
            .count();
        let ticks = recorded
            .iter()
            .filter(|t| matches!(t, SessionTransition::Ticked { .. }))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(ticks, 59);
    }

    #[test]
    fn ray_on_target_scores_and_requests_haptics() {
        let mut app = game_app();
        app.world_mut().send_event(GameEvent::Start);
        app.update();

        let target = *app
            .world()
            .resource::<GameSession>()
            .current_target()
            .unwrap();
        app.world_mut().resource_mut::<ControllerPose>().update(
            target.world_position + Vec3::new(0.0, 0.0, 0.5),
            Quat::IDENTITY,
            PoseSource::Host,
        );
        app.update();

        let session = app.world().resource::<GameSession>();
        assert_eq!(session.score(), 1);
        assert_ne!(session.current_target().unwrap().index, target.index);

        let pulses = app.world().resource::<Events<HapticPulse>>();
        assert!(!pulses.is_empty());
    }

    #[test]
    fn teardown_stops_timer_and_ends_session() {
        let mut app = game_app();
        app.world_mut().send_event(GameEvent::Start);
        app.update();

        app.world_mut().send_event(XrLifecycleEvent::SessionEnded);
        app.update();

        assert_eq!(
            app.world().resource::<GameSession>().phase(),
            SessionPhase::Ended
        );
        assert!(!app.world().resource::<TickTimer>().is_running());
        assert!(
            app.world()
                .resource::<Recorded>()
                .0
                .contains(&SessionTransition::Ended(EndReason::External))
        );
    }

    #[test]
    fn select_restarts_only_a_finished_run() {
        let mut app = game_app();
        app.world_mut().send_event(GameEvent::Start);
        app.update();
        app.world_mut()
            .resource_mut::<GameSession>()
            .on_hit(&mut StdRng::seed_from_u64(1));

        app.world_mut().send_event(InputEvent::Select);
        app.update();
        assert_eq!(app.world().resource::<GameSession>().score(), 1);

        app.world_mut().send_event(GameEvent::ExternalEnd);
        app.update();
        app.world_mut().send_event(InputEvent::Select);
        app.update();

        let session = app.world().resource::<GameSession>();
        assert!(session.active());
        assert_eq!(session.score(), 0);
    }
}
