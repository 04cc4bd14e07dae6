use bevy::prelude::*;

use crate::engine::scene::ground::GroundCreated;
use crate::tools::tool_manager::DrawStatus;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Resource)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct DrawStatusText;

/// Enter the interactive state once the ground plane exists.
///
/// Imagery may still be in flight at this point; it lands on the plane
/// whenever its fetch finishes.
pub fn transition_to_running(
    ground_created: Res<GroundCreated>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if ground_created.created {
        println!("→ Site ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Mirror the status line into the native overlay.
pub fn status_text_update_system(
    status: Res<DrawStatus>,
    mut query: Query<&mut Text, With<DrawStatusText>>,
) {
    if !status.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.0 = status.message.clone();
    }
}
