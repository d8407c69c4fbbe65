use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::events::GameEvent;
use super::hit::{ControllerRay, test_hit};
use super::selector::{Target, select_target};
use super::settings::{GameSettings, TargetAnchor};
use crate::engine::point_cloud::PointCloud;
use constants::game::{SESSION_DURATION_SECS, TARGET_HIT_RADIUS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    TimeUp,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartRejection {
    #[error("a session is already running")]
    AlreadyActive,
    #[error("the point cloud has not been loaded yet")]
    PointCloudMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Counting { remaining_secs: u32 },
    Expired,
}

/// Observable result of dispatching one `GameEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Started,
    Scored { score: u32 },
    Ticked { remaining_secs: u32 },
    Ended(EndReason),
    Ignored,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSnapshot {
    pub index: usize,
    pub position: [f32; 3],
    pub hit_radius: f32,
}

/// Serializable view of the session for the host page.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub active: bool,
    pub score: u32,
    pub remaining_secs: u32,
    pub target: Option<TargetSnapshot>,
    pub runs_completed: u32,
}

/// One play-through: score, countdown, and the single live target.
///
/// Events arriving in a phase that does not accept them are ignored rather
/// than treated as errors, so callers may forward every frame's input
/// without checking `active()` first.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    phase: SessionPhase,
    score: u32,
    remaining_secs: u32,
    duration_secs: u32,
    hit_radius: f32,
    anchor: TargetAnchor,
    placement: Transform,
    current_target: Option<Target>,
    point_cloud: Option<PointCloud>,
    runs_completed: u32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SESSION_DURATION_SECS, TARGET_HIT_RADIUS, TargetAnchor::default())
    }
}

impl GameSession {
    pub fn new(duration_secs: u32, hit_radius: f32, anchor: TargetAnchor) -> Self {
        Self {
            phase: SessionPhase::Idle,
            score: 0,
            remaining_secs: duration_secs,
            duration_secs,
            hit_radius,
            anchor,
            placement: Transform::IDENTITY,
            current_target: None,
            point_cloud: None,
            runs_completed: 0,
        }
    }

    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(
            settings.session_duration_secs,
            settings.hit_radius,
            settings.target_anchor,
        )
    }

    pub fn attach_point_cloud(&mut self, cloud: PointCloud) {
        self.point_cloud = Some(cloud);
    }

    /// Records the model's current placement. New targets are resolved
    /// against it; under `TargetAnchor::FollowModel` the live target is
    /// moved along with it.
    pub fn follow_model(&mut self, placement: Transform) {
        self.placement = placement;
        if self.anchor == TargetAnchor::FollowModel {
            self.refresh_target_world_position();
        }
    }

    /// Recomputes the live target's world position from the recorded placement.
    pub fn refresh_target_world_position(&mut self) {
        if let Some(target) = self.current_target.as_mut() {
            *target = target.anchored_to(&self.placement);
        }
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), StartRejection> {
        if self.phase == SessionPhase::Active {
            return Err(StartRejection::AlreadyActive);
        }
        let Some(cloud) = self.point_cloud.as_ref() else {
            return Err(StartRejection::PointCloudMissing);
        };

        let target = select_target(cloud, &self.placement, None, self.hit_radius, rng);
        self.score = 0;
        self.remaining_secs = self.duration_secs;
        self.current_target = Some(target);
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// Scores the current target and replaces it. Returns `false` when the
    /// session is not running.
    pub fn on_hit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        let Some(cloud) = self.point_cloud.as_ref() else {
            return false;
        };

        let previous = self.current_target.map(|t| t.index);
        self.current_target = Some(select_target(
            cloud,
            &self.placement,
            previous,
            self.hit_radius,
            rng,
        ));
        self.score = self.score.saturating_add(1);
        true
    }

    pub fn on_tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Active {
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish();
            return TickOutcome::Expired;
        }
        TickOutcome::Counting {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Forces `Ended` from any phase. Returns `true` if a running game was cut short.
    pub fn on_external_end(&mut self) -> bool {
        let was_active = self.phase == SessionPhase::Active;
        if was_active {
            self.finish();
        } else {
            self.phase = SessionPhase::Ended;
            self.current_target = None;
        }
        was_active
    }

    fn finish(&mut self) {
        self.phase = SessionPhase::Ended;
        self.current_target = None;
        self.runs_completed += 1;
    }

    pub fn dispatch<R: Rng + ?Sized>(
        &mut self,
        event: GameEvent,
        rng: &mut R,
    ) -> SessionTransition {
        match event {
            GameEvent::Start => match self.start(rng) {
                Ok(()) => SessionTransition::Started,
                Err(StartRejection::AlreadyActive) => SessionTransition::Ignored,
                Err(rejection) => {
                    warn!("Start rejected: {rejection}");
                    SessionTransition::Ignored
                }
            },
            GameEvent::Hit => {
                if self.on_hit(rng) {
                    SessionTransition::Scored { score: self.score }
                } else {
                    SessionTransition::Ignored
                }
            }
            GameEvent::Tick => match self.on_tick() {
                TickOutcome::Ignored => SessionTransition::Ignored,
                TickOutcome::Counting { remaining_secs } => {
                    SessionTransition::Ticked { remaining_secs }
                }
                TickOutcome::Expired => SessionTransition::Ended(EndReason::TimeUp),
            },
            // Only a run that was cut short is announced; Idle still moves to Ended.
            GameEvent::ExternalEnd => {
                if self.on_external_end() {
                    SessionTransition::Ended(EndReason::External)
                } else {
                    SessionTransition::Ignored
                }
            }
        }
    }

    /// Per-frame touch check. Safe without a target or while inactive.
    pub fn is_touching(&self, ray: &ControllerRay) -> bool {
        self.phase == SessionPhase::Active
            && self
                .current_target
                .as_ref()
                .is_some_and(|target| test_hit(ray, target))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.current_target.as_ref()
    }

    pub fn point_cloud(&self) -> Option<&PointCloud> {
        self.point_cloud.as_ref()
    }

    pub fn is_startable(&self) -> bool {
        self.point_cloud.is_some() && self.phase != SessionPhase::Active
    }

    #[cfg(test)]
    pub fn runs_completed(&self) -> u32 {
        self.runs_completed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            active: self.active(),
            score: self.score,
            remaining_secs: self.remaining_secs,
            target: self.current_target.map(|t| TargetSnapshot {
                index: t.index,
                position: t.world_position.to_array(),
                hit_radius: t.hit_radius,
            }),
            runs_completed: self.runs_completed,
        }
    }
}
