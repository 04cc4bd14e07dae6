use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::drawing::{FOOTPRINT_EDGE_HEIGHT, POINT_MARKER_LIFT};
use constants::render_settings::{DRAW_LINE_WIDTH, DRAW_VERTEX_SIZE};

use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::footprint::input::{FootprintClosedEvent, ShapePickEvent};
use crate::tools::footprint::session::DrawingSession;
use crate::tools::tool_manager::{DrawStatus, MassingAction, MassingActionEvent, MassingSettings};

use super::geometry::{build_extruded_solid, build_flat_shape};
use super::picking::pick_shape;
use super::registry::ShapeRegistry;

/// Kind of visual primitive a shape owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeVisualKind {
    Marker,
    Edge,
    Fill,
    Solid,
}

/// Tag tying a visual primitive to its shape in the registry.
///
/// This is the back-reference used to reposition markers and edges when the
/// shape is extruded, and to sweep everything on reset.
#[derive(Component)]
pub struct ShapeVisual {
    pub shape: u32,
    pub kind: ShapeVisualKind,
}

fn outline_material(materials: &mut ResMut<Assets<StandardMaterial>>) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.42, 0.42),
        emissive: LinearRgba::new(0.6, 0.2, 0.2, 1.0),
        unlit: true,
        ..default()
    })
}

/// Promote a freshly closed footprint into a flat shape.
///
/// Builds the fill mesh first; only a successful build registers the shape
/// and spawns its visuals, so a geometry failure leaves no partial entries
/// anywhere.
pub fn handle_footprint_closed(
    mut commands: Commands,
    mut events: EventReader<FootprintClosedEvent>,
    mut registry: ResMut<ShapeRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut status: ResMut<DrawStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let fill_mesh = match build_flat_shape(&event.points, FOOTPRINT_EDGE_HEIGHT) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!("Failed to build footprint fill: {err}");
                status.set("Error creating building footprint - try a simpler shape");
                rpc_interface.send_notification(
                    "massing_error",
                    serde_json::json!({ "error": err.to_string() }),
                );
                continue;
            }
        };

        let id = registry.add_flat(event.points.clone());

        // Fill polygon, clickable for extrusion via the registry.
        commands.spawn((
            Mesh3d(meshes.add(fill_mesh)),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(1.0, 0.42, 0.42, 0.35),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            ShapeVisual {
                shape: id,
                kind: ShapeVisualKind::Fill,
            },
            RenderLayers::layer(1),
        ));

        // The drawing-time markers and edges become shape-owned so extrusion
        // can raise them later; the closing edge appears here for the first
        // time.
        for point in &event.points {
            commands.spawn((
                Mesh3d(meshes.add(Sphere::new(DRAW_VERTEX_SIZE))),
                MeshMaterial3d(outline_material(&mut materials)),
                Transform::from_translation(Vec3::new(point.x, POINT_MARKER_LIFT, point.y)),
                ShapeVisual {
                    shape: id,
                    kind: ShapeVisualKind::Marker,
                },
                RenderLayers::layer(1),
            ));
        }

        let n = event.points.len();
        for i in 0..n {
            let from = event.points[i];
            let to = event.points[(i + 1) % n];
            let start = Vec3::new(from.x, FOOTPRINT_EDGE_HEIGHT, from.y);
            let end = Vec3::new(to.x, FOOTPRINT_EDGE_HEIGHT, to.y);
            let direction = end - start;
            let distance = direction.length();
            if distance < 0.01 {
                continue;
            }
            let midpoint = (start + end) * 0.5;
            let rotation = Quat::from_rotation_arc(Vec3::X, direction.normalize());
            commands.spawn((
                Mesh3d(meshes.add(Cuboid::new(distance, DRAW_LINE_WIDTH, DRAW_LINE_WIDTH))),
                MeshMaterial3d(outline_material(&mut materials)),
                Transform::from_translation(midpoint).with_rotation(rotation),
                ShapeVisual {
                    shape: id,
                    kind: ShapeVisualKind::Edge,
                },
                RenderLayers::layer(1),
            ));
        }

        info!("Registered flat shape {id} with {n} points");
        rpc_interface.send_notification(
            "shape_registered",
            serde_json::json!({
                "shape_id": id,
                "point_count": n,
            }),
        );
    }
}

/// Extrude a flat shape, replacing its fill with a solid and raising its
/// outline visuals to the new height.
#[allow(clippy::too_many_arguments)]
fn extrude_shape(
    commands: &mut Commands,
    registry: &mut ShapeRegistry,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    visuals: &mut Query<(Entity, &ShapeVisual, &mut Transform)>,
    status: &mut DrawStatus,
    rpc_interface: &mut WebRpcInterface,
    id: u32,
    height: f32,
) {
    if let Err(err) = registry.extrude(id, height) {
        warn!("Extrusion rejected: {err}");
        status.set(format!("{err}"));
        rpc_interface.send_notification(
            "massing_error",
            serde_json::json!({ "error": err.to_string(), "shape_id": id }),
        );
        return;
    }

    // Points were validated at registration and the height guard has
    // passed, so the solid build cannot fail here.
    let shape = match registry.get(id) {
        Some(shape) => shape,
        None => return,
    };
    let solid_mesh = match build_extruded_solid(&shape.points, height) {
        Ok(mesh) => mesh,
        Err(err) => {
            error!("Solid build failed for registered shape {id}: {err}");
            return;
        }
    };

    commands.spawn((
        Mesh3d(meshes.add(solid_mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.29, 0.56, 0.89, 0.8),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.9,
            ..default()
        })),
        ShapeVisual {
            shape: id,
            kind: ShapeVisualKind::Solid,
        },
        RenderLayers::layer(1),
    ));

    // Raise the outline so it caps the solid; the flat fill retires.
    for (entity, visual, mut transform) in visuals.iter_mut() {
        if visual.shape != id {
            continue;
        }
        match visual.kind {
            ShapeVisualKind::Marker => {
                transform.translation.y = height + POINT_MARKER_LIFT;
            }
            ShapeVisualKind::Edge => {
                transform.translation.y = height + FOOTPRINT_EDGE_HEIGHT;
            }
            ShapeVisualKind::Fill => {
                commands.entity(entity).despawn();
            }
            ShapeVisualKind::Solid => {}
        }
    }

    info!("Extruded shape {id} to height {height}");
    status.set(format!("Building created! Height: {height}m"));
    rpc_interface.send_notification(
        "shape_extruded",
        serde_json::json!({ "shape_id": id, "height": height }),
    );
}

/// Resolve `Idle`-mode clicks against the registry; a flat hit extrudes with
/// the configured height, an extruded hit is ignored.
#[allow(clippy::too_many_arguments)]
pub fn handle_shape_pick_events(
    mut commands: Commands,
    mut events: EventReader<ShapePickEvent>,
    mut registry: ResMut<ShapeRegistry>,
    settings: Res<MassingSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visuals: Query<(Entity, &ShapeVisual, &mut Transform)>,
    mut status: ResMut<DrawStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let Some(id) = pick_shape(event.origin, event.direction, registry.shapes()) else {
            continue;
        };
        let Some(shape) = registry.get(id) else {
            continue;
        };
        if !shape.is_flat() {
            // No re-extrusion, no deletion.
            debug!("Ignoring click on extruded shape {id}");
            continue;
        }

        extrude_shape(
            &mut commands,
            &mut registry,
            &mut meshes,
            &mut materials,
            &mut visuals,
            &mut status,
            &mut rpc_interface,
            id,
            settings.height,
        );
    }
}

/// Handle the explicit extrude and reset actions.
///
/// `ToggleDrawing` and `SetHeight` from the same event stream are handled by
/// the tool manager.
#[allow(clippy::too_many_arguments)]
pub fn handle_promotion_actions(
    mut commands: Commands,
    mut events: EventReader<MassingActionEvent>,
    mut registry: ResMut<ShapeRegistry>,
    mut session: ResMut<DrawingSession>,
    settings: Res<MassingSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visuals: Query<(Entity, &ShapeVisual, &mut Transform)>,
    mut status: ResMut<DrawStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        match event.action {
            MassingAction::Extrude => {
                let Some(id) = registry.latest_flat().map(|s| s.id) else {
                    status.set("Draw a closed footprint first, then extrude");
                    rpc_interface.send_notification(
                        "massing_error",
                        serde_json::json!({ "error": "No flat shape to extrude" }),
                    );
                    continue;
                };
                extrude_shape(
                    &mut commands,
                    &mut registry,
                    &mut meshes,
                    &mut materials,
                    &mut visuals,
                    &mut status,
                    &mut rpc_interface,
                    id,
                    settings.height,
                );
            }
            MassingAction::Reset => {
                for (entity, _, _) in visuals.iter_mut() {
                    commands.entity(entity).despawn();
                }
                registry.clear();
                session.reset();
                // In-progress markers and previews rebuild from the now
                // empty session on the next frame.
                status.set("Scene reset - toggle drawing to begin");
                info!("Scene reset via {:?}", event.source);
                rpc_interface.send_notification("scene_reset", serde_json::json!({}));
            }
            MassingAction::ToggleDrawing | MassingAction::SetHeight(_) => {}
        }
    }
}
