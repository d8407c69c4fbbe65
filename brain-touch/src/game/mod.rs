//! Target-selection and scoring game loop.
//!
//! The session is a plain state machine (`GameSession`) driven by
//! `GameEvent`s. Systems in this module translate frame time, controller
//! rays and host lifecycle into those events; nothing else mutates the
//! session's score, countdown or target.
//!
//! ```text
//! Idle ──Start──> Active ──Tick (0s left)──> Ended ──Start──> Active
//!                   │  ▲                       ▲
//!                   │  └─Hit: score+1, new target
//!                   └──────ExternalEnd─────────┘
//! ```

/// Event types exchanged between input, session and presentation.
pub mod events;

/// Ray–sphere hit tester for the controller ray.
pub mod hit;

/// Random target selection over the point cloud.
pub mod selector;

/// The `GameSession` state machine.
pub mod session;

/// Runtime configuration, overridable from JSON.
pub mod settings;

/// Per-frame and per-second systems feeding the session.
pub mod systems;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use events::{GameEvent, SessionChanged};
use session::GameSession;
use settings::GameSettings;
use systems::{
    GameRng, TickTimer, detect_target_touch, dispatch_game_events, end_on_session_teardown,
    restart_on_select, tick_session_timer,
};

/// Frame ordering: input is gathered, the session advances, then state is
/// mirrored into the scene and out to the host.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Simulation,
    Presentation,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSettings>()
            .init_resource::<GameSession>()
            .init_resource::<GameRng>()
            .init_resource::<TickTimer>()
            .add_event::<GameEvent>()
            .add_event::<SessionChanged>()
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Simulation, GameSet::Presentation).chain(),
            )
            .add_systems(
                Update,
                (
                    restart_on_select.run_if(in_state(AppState::Running)),
                    end_on_session_teardown,
                    tick_session_timer,
                    detect_target_touch.run_if(in_state(AppState::Running)),
                    dispatch_game_events,
                )
                    .chain()
                    .in_set(GameSet::Simulation),
            );
    }
}
