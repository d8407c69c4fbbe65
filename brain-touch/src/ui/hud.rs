use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::render_settings::HUD_FONT_SIZE;

use crate::engine::core::app_state::AppState;
use crate::game::session::{GameSession, SessionPhase};

#[derive(Component)]
pub struct ScoreText;

#[derive(Component)]
pub struct TimeText;

#[derive(Component)]
pub struct StatusText;

#[derive(Component)]
pub struct FpsText;

fn hud_text(label: &str, colour: Color, node: Node) -> impl Bundle {
    (
        Text::new(label),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(colour),
        node,
    )
}

fn anchored(top: Option<f32>, bottom: Option<f32>, left: Option<f32>, right: Option<f32>) -> Node {
    Node {
        position_type: PositionType::Absolute,
        top: top.map_or(Val::Auto, Val::Px),
        bottom: bottom.map_or(Val::Auto, Val::Px),
        left: left.map_or(Val::Auto, Val::Px),
        right: right.map_or(Val::Auto, Val::Px),
        ..default()
    }
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                hud_text("Score: 0", Color::WHITE, anchored(Some(12.0), None, Some(12.0), None)),
                ScoreText,
            ));
            parent.spawn((
                hud_text("Time: --", Color::WHITE, anchored(Some(36.0), None, Some(12.0), None)),
                TimeText,
            ));
            parent.spawn((
                hud_text(
                    "",
                    Color::srgb(0.8, 0.8, 0.8),
                    anchored(None, Some(12.0), Some(12.0), None),
                ),
                StatusText,
            ));
            parent.spawn((
                hud_text(
                    "FPS: ",
                    Color::srgb(1., 0., 0.),
                    anchored(None, Some(12.0), None, Some(12.0)),
                ),
                FpsText,
            ));
        });
}

/// One-line prompt for the current stage of the game.
pub fn status_line(state: AppState, session: &GameSession) -> String {
    match state {
        AppState::Loading => "Loading brain model...".to_string(),
        AppState::LoadFailed => "The brain model could not be loaded".to_string(),
        AppState::AssetsLoaded => "Click to place the brain".to_string(),
        AppState::Running => match session.phase() {
            SessionPhase::Idle => "Click to start".to_string(),
            SessionPhase::Active => "Touch the green point!".to_string(),
            SessionPhase::Ended => format!(
                "Game over! Final score: {}. Click to play again",
                session.score()
            ),
        },
    }
}

pub fn update_hud_text(
    session: Res<GameSession>,
    state: Res<State<AppState>>,
    mut texts: ParamSet<(
        Query<&mut Text, With<ScoreText>>,
        Query<&mut Text, With<TimeText>>,
        Query<&mut Text, With<StatusText>>,
    )>,
) {
    if !session.is_changed() && !state.is_changed() {
        return;
    }

    for mut text in &mut texts.p0() {
        text.0 = format!("Score: {}", session.score());
    }
    for mut text in &mut texts.p1() {
        text.0 = format!("Time: {}s", session.remaining_secs());
    }
    for mut text in &mut texts.p2() {
        text.0 = status_line(*state.get(), &session);
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::point_cloud::PointCloud;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn prompts_follow_the_loading_stages() {
        let session = GameSession::default();
        assert_eq!(status_line(AppState::Loading, &session), "Loading brain model...");
        assert_eq!(status_line(AppState::AssetsLoaded, &session), "Click to place the brain");
        assert_eq!(
            status_line(AppState::LoadFailed, &session),
            "The brain model could not be loaded"
        );
    }

    #[test]
    fn finished_run_shows_final_score() {
        let mut session = GameSession::default();
        session.attach_point_cloud(PointCloud::from_positions(vec![Vec3::X, Vec3::Y]).unwrap());
        let mut rng = StdRng::seed_from_u64(9);
        session.start(&mut rng).unwrap();
        assert_eq!(status_line(AppState::Running, &session), "Touch the green point!");

        session.on_hit(&mut rng);
        session.on_hit(&mut rng);
        session.on_external_end();
        assert_eq!(
            status_line(AppState::Running, &session),
            "Game over! Final score: 2. Click to play again"
        );
    }
}
