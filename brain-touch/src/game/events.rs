use bevy::prelude::*;

use super::session::{SessionPhase, SessionTransition};

/// Everything that can happen to a play session, whatever delivered it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// First model placement, or a select after a finished run.
    Start,
    /// The controller ray touched the current target.
    Hit,
    /// One second of the countdown elapsed.
    Tick,
    /// The host rendering session was torn down.
    ExternalEnd,
}

/// Emitted after every processed game event, for the HUD and the host page.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SessionChanged {
    pub transition: SessionTransition,
    pub phase: SessionPhase,
    pub score: u32,
    pub remaining_secs: u32,
}
