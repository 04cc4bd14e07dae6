use bevy::prelude::*;
use constants::drawing::DEFAULT_BUILDING_HEIGHT;

use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::footprint::session::{DrawMode, DrawingSession};

/// Actions the user surface can trigger, from either input source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MassingAction {
    /// Toggle the drawing session between `Idle` and `Drawing`.
    ToggleDrawing,
    /// Configure the height used by subsequent extrusions.
    SetHeight(f32),
    /// Extrude the most recently closed flat shape with the configured height.
    Extrude,
    /// Clear all drawn and extruded content and restart.
    Reset,
}

/// Source of an action for debugging and conditional logic.
#[derive(Debug, Clone, Copy)]
pub enum ActionSource {
    Rpc,
    Keyboard,
}

/// Event fired when a massing action is requested via RPC or keyboard.
///
/// Two systems consume this stream: `handle_massing_action_events` here
/// covers `ToggleDrawing`/`SetHeight`, and the promotion systems cover
/// `Extrude`/`Reset` since those mutate the shape registry and its visuals.
#[derive(Event)]
pub struct MassingActionEvent {
    pub action: MassingAction,
    pub source: ActionSource,
}

/// Currently configured extrusion height.
#[derive(Resource)]
pub struct MassingSettings {
    pub height: f32,
}

impl Default for MassingSettings {
    fn default() -> Self {
        Self {
            height: DEFAULT_BUILDING_HEIGHT,
        }
    }
}

/// Latest user-facing drawing status line.
///
/// The session side only writes this resource; presentation layers (the
/// native overlay and the RPC broadcast) observe changes independently, so
/// the core never touches a DOM or text node directly.
#[derive(Resource, Default)]
pub struct DrawStatus {
    pub message: String,
}

impl DrawStatus {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

/// Handle mode and height actions with validation and frontend notifications.
pub fn handle_massing_action_events(
    mut events: EventReader<MassingActionEvent>,
    mut session: ResMut<DrawingSession>,
    mut settings: ResMut<MassingSettings>,
    mut status: ResMut<DrawStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        match event.action {
            MassingAction::ToggleDrawing => {
                let mode = session.toggle_drawing();
                match mode {
                    DrawMode::Drawing => {
                        status.set("Drawing mode active - click to place points");
                    }
                    DrawMode::Idle => {
                        status.set(format!(
                            "Drawing stopped - {} points placed",
                            session.points().len()
                        ));
                    }
                }
                info!("Drawing toggled via {:?}: {:?}", event.source, mode);

                rpc_interface.send_notification(
                    "draw_mode_changed",
                    serde_json::json!({
                        "drawing": mode == DrawMode::Drawing,
                        "point_count": session.points().len(),
                    }),
                );
            }
            MassingAction::SetHeight(height) => {
                if height > 0.0 {
                    settings.height = height;
                    rpc_interface.send_notification(
                        "height_changed",
                        serde_json::json!({ "height": height }),
                    );
                } else {
                    warn!("Rejected non-positive building height: {height}");
                    status.set("Please enter a height greater than 0");
                    rpc_interface.send_notification(
                        "massing_error",
                        serde_json::json!({
                            "error": "Height must be greater than 0",
                            "height": height,
                        }),
                    );
                }
            }
            // Handled by the shape promotion systems.
            MassingAction::Extrude | MassingAction::Reset => {}
        }
    }
}

/// Broadcast status line changes to the frontend.
pub fn broadcast_draw_status(
    status: Res<DrawStatus>,
    session: Res<DrawingSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !status.is_changed() || status.message.is_empty() {
        return;
    }
    rpc_interface.send_notification(
        "draw_status_changed",
        serde_json::json!({
            "message": status.message,
            "drawing": session.is_drawing(),
            "point_count": session.points().len(),
        }),
    );
}

/// Keyboard shortcuts for massing actions (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_massing_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<MassingSettings>,
    mut action_events: EventWriter<MassingActionEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyD) {
        action_events.write(MassingActionEvent {
            action: MassingAction::ToggleDrawing,
            source: ActionSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyE) {
        action_events.write(MassingActionEvent {
            action: MassingAction::Extrude,
            source: ActionSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        action_events.write(MassingActionEvent {
            action: MassingAction::Reset,
            source: ActionSource::Keyboard,
        });
    }

    // Arrow keys step the configured building height.
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        action_events.write(MassingActionEvent {
            action: MassingAction::SetHeight(settings.height + 1.0),
            source: ActionSource::Keyboard,
        });
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        action_events.write(MassingActionEvent {
            action: MassingAction::SetHeight(settings.height - 1.0),
            source: ActionSource::Keyboard,
        });
    }
}

/// Placeholder for WASM builds where actions arrive via RPC only.
#[cfg(target_arch = "wasm32")]
pub fn handle_massing_keyboard_shortcuts() {}
