use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use super::session_pump::ArDriver;
use crate::engine::core::app_state::{AppState, StatusText};
use crate::engine::loading::config_loader::SessionFailure;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scheduler::FrameStats;
use crate::error::ArError;

pub fn create_status_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading..."),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

pub fn status_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    state: Res<State<AppState>>,
    loading_progress: Res<LoadingProgress>,
    failure: Option<Res<SessionFailure>>,
    driver: Option<NonSend<ArDriver>>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed());
    let session = driver
        .as_ref()
        .map(|driver| (driver.stats(), driver.placement().placed().len()));

    let line = status_line(
        fps,
        *state.get(),
        &loading_progress,
        session,
        failure.as_ref().map(|f| &f.0),
    );
    for mut text in &mut query {
        if text.0 != line {
            text.0.clone_from(&line);
        }
    }
}

fn status_line(
    fps: Option<f64>,
    state: AppState,
    progress: &LoadingProgress,
    session: Option<(FrameStats, usize)>,
    failure: Option<&ArError>,
) -> String {
    let fps = fps.map_or_else(|| "--".to_string(), |value| format!("{value:.1}"));

    match state {
        AppState::Loading => format!("FPS: {fps} | Loading config..."),
        AppState::SessionFailed => match failure {
            Some(err) => format!("AR unavailable: {err}"),
            None => "AR unavailable".to_string(),
        },
        AppState::Running | AppState::Ended => {
            let (stats, placed) = session.unwrap_or_default();
            let models = if progress.models_loaded() {
                ""
            } else {
                " | Loading models..."
            };
            let ended = if state == AppState::Ended {
                " | Session ended"
            } else {
                ""
            };
            format!(
                "FPS: {fps} | Frames: {} | No pose: {} | Placed: {placed}{models}{ended}",
                stats.rendered, stats.skipped_no_pose
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_line_reports_counts() {
        let progress = LoadingProgress {
            reticle_loaded: true,
            placeable_loaded: true,
            ..default()
        };
        let stats = FrameStats {
            rendered: 42,
            skipped_no_pose: 3,
            ..default()
        };
        let line = status_line(
            Some(59.96),
            AppState::Running,
            &progress,
            Some((stats, 2)),
            None,
        );
        assert_eq!(line, "FPS: 60.0 | Frames: 42 | No pose: 3 | Placed: 2");
    }

    #[test]
    fn failure_line_names_the_error() {
        let line = status_line(
            None,
            AppState::SessionFailed,
            &LoadingProgress::default(),
            None,
            Some(&ArError::SessionEnded),
        );
        assert!(line.starts_with("AR unavailable: "));
    }

    #[test]
    fn pending_models_are_flagged() {
        let line = status_line(
            None,
            AppState::Running,
            &LoadingProgress::default(),
            None,
            None,
        );
        assert!(line.contains("Loading models"));
        assert!(line.starts_with("FPS: --"));
    }
}
