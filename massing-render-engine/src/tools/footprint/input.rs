use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::massing::geometry::validate_outline;
use crate::tools::tool_manager::DrawStatus;

use super::session::{DrawingSession, PlacePointOutcome};

/// Pointer ground intersection tracked once per frame for preview rendering.
#[derive(Resource, Default)]
pub struct FootprintCursor {
    pub ground: Option<Vec2>,
}

/// Event fired when a closing click seals the footprint polygon.
///
/// The promotion systems consume it to build the flat shape; routing the
/// points through an event keeps the same click from also being treated as
/// a shape-pick click in the frame the session returns to `Idle`.
#[derive(Event)]
pub struct FootprintClosedEvent {
    pub points: Vec<Vec2>,
}

/// Event fired for `Idle`-mode clicks, carrying the pointer ray for shape
/// picking.
#[derive(Event)]
pub struct ShapePickEvent {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Route pointer input into the drawing session.
///
/// Every frame the pointer's ground intersection is refreshed for the
/// preview. A primary-button click either places/closes a footprint vertex
/// (while drawing) or is handed to shape picking (while idle). Clicks with
/// no ground intersection are ignored entirely.
pub fn footprint_input_system(
    mut session: ResMut<DrawingSession>,
    mut cursor: ResMut<FootprintCursor>,
    mut status: ResMut<DrawStatus>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    viewport_camera: Res<ViewportCamera>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut closed_events: EventWriter<FootprintClosedEvent>,
    mut pick_events: EventWriter<ShapePickEvent>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    let cursor_pos = window.cursor_position();
    cursor.ground = cursor_pos
        .and_then(|pos| viewport_camera.mouse_to_ground_plane(pos, camera, camera_transform))
        .map(|hit| Vec2::new(hit.x, hit.z));

    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor_pos) = cursor_pos else {
        return;
    };

    if !session.is_drawing() {
        // Idle clicks are tested against existing shapes for extrusion.
        if let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) {
            pick_events.write(ShapePickEvent {
                origin: ray.origin,
                direction: ray.direction.as_vec3(),
            });
        }
        return;
    }

    let Some(ground) = cursor.ground else {
        return;
    };

    // A closing click is only honoured for outlines the geometry builder
    // will accept; otherwise the session is left exactly as it was.
    if session.would_close(ground) {
        if let Err(err) = validate_outline(session.points()) {
            warn!("Footprint cannot close: {err}");
            status.set("Cannot close this footprint - try a simpler outline");
            rpc_interface.send_notification(
                "massing_error",
                serde_json::json!({ "error": err.to_string() }),
            );
            return;
        }
    }

    match session.place_point(ground) {
        PlacePointOutcome::Appended { index } => {
            let count = index + 1;
            status.set(format!(
                "{count} points placed - click near first point to close shape"
            ));
            rpc_interface.send_notification(
                "footprint_point_added",
                serde_json::json!({
                    "point_count": count,
                    "position": [ground.x, ground.y],
                }),
            );
        }
        PlacePointOutcome::Closed { points } => {
            status.set(format!("Drawing complete - {} points placed", points.len()));
            rpc_interface.send_notification(
                "footprint_closed",
                serde_json::json!({ "point_count": points.len() }),
            );
            closed_events.write(FootprintClosedEvent { points });
        }
    }
}
