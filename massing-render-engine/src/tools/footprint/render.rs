use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::drawing::{FOOTPRINT_EDGE_HEIGHT, POINT_MARKER_LIFT};
use constants::render_settings::{
    CLOSING_GUIDE_WIDTH, DRAW_LINE_WIDTH, DRAW_VERTEX_SIZE,
    MOUSE_RAYCAST_INTERSECTION_SPHERE_SIZE, PREVIEW_LINE_WIDTH,
};

use super::input::FootprintCursor;
use super::preview::preview_segments;
use super::session::DrawingSession;

/// Component markers for in-progress footprint visualisation entities.
/// Enables selective cleanup and rendering control.
#[derive(Component)]
pub struct FootprintPoints;

#[derive(Component)]
pub struct FootprintLines;

#[derive(Component)]
pub struct FootprintPreview;

fn marker_material(materials: &mut ResMut<Assets<StandardMaterial>>) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.42, 0.42),
        emissive: LinearRgba::new(0.6, 0.2, 0.2, 1.0),
        unlit: true,
        ..default()
    })
}

/// Spawn an edge cuboid between two ground points at the given lift.
fn spawn_edge_segment(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
    from: Vec2,
    to: Vec2,
    width: f32,
    lift: f32,
    tag: impl Bundle,
) {
    let start = Vec3::new(from.x, lift, from.y);
    let end = Vec3::new(to.x, lift, to.y);
    let direction = end - start;
    let distance = direction.length();
    if distance < 0.01 {
        return;
    }
    let midpoint = (start + end) * 0.5;
    let rotation = Quat::from_rotation_arc(Vec3::X, direction.normalize());

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(distance, width, width))),
        MeshMaterial3d(material),
        Transform::from_translation(midpoint).with_rotation(rotation),
        tag,
        RenderLayers::layer(1),
    ));
}

/// Rebuild vertex markers and edges of the in-progress footprint each frame.
///
/// Everything is derived from session state: once the session closes or
/// resets, the stale entities disappear on the next pass without any
/// bookkeeping. The closing edge is intentionally absent until completion.
pub fn update_footprint_render(
    mut commands: Commands,
    session: Res<DrawingSession>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing_points: Query<Entity, With<FootprintPoints>>,
    existing_lines: Query<Entity, With<FootprintLines>>,
) {
    for entity in existing_points.iter().chain(existing_lines.iter()) {
        commands.entity(entity).despawn();
    }

    if session.points().is_empty() {
        return;
    }

    for point in session.points() {
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(DRAW_VERTEX_SIZE))),
            MeshMaterial3d(marker_material(&mut materials)),
            Transform::from_translation(Vec3::new(point.x, POINT_MARKER_LIFT, point.y)),
            FootprintPoints,
            RenderLayers::layer(1),
        ));
    }

    for pair in session.points().windows(2) {
        spawn_edge_segment(
            &mut commands,
            &mut meshes,
            marker_material(&mut materials),
            pair[0],
            pair[1],
            DRAW_LINE_WIDTH,
            FOOTPRINT_EDGE_HEIGHT,
            FootprintLines,
        );
    }
}

/// Rebuild the transient preview segments each frame.
///
/// Discard-and-replace: previous preview entities are despawned
/// unconditionally, so leaving `Drawing` mode removes both segments with no
/// extra cleanup path.
pub fn update_footprint_preview(
    mut commands: Commands,
    session: Res<DrawingSession>,
    cursor: Res<FootprintCursor>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing_preview: Query<Entity, With<FootprintPreview>>,
) {
    for entity in existing_preview.iter() {
        commands.entity(entity).despawn();
    }

    // Cursor sphere at the pointer's ground intersection while drawing.
    if session.is_drawing() {
        if let Some(ground) = cursor.ground {
            commands.spawn((
                Mesh3d(meshes.add(Sphere::new(MOUSE_RAYCAST_INTERSECTION_SPHERE_SIZE))),
                MeshMaterial3d(marker_material(&mut materials)),
                Transform::from_translation(Vec3::new(ground.x, FOOTPRINT_EDGE_HEIGHT, ground.y)),
                FootprintPreview,
                RenderLayers::layer(1),
            ));
        }
    }

    let segments = preview_segments(session.mode(), session.points(), cursor.ground);
    if segments.is_empty() {
        return;
    }

    if let Some([from, to]) = segments.active {
        spawn_edge_segment(
            &mut commands,
            &mut meshes,
            marker_material(&mut materials),
            from,
            to,
            PREVIEW_LINE_WIDTH,
            FOOTPRINT_EDGE_HEIGHT,
            FootprintPreview,
        );
    }

    // The closing guide is thinner and translucent to read as a hint.
    if let Some([from, to]) = segments.closing {
        let guide_material = materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.42, 0.42, 0.4),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        spawn_edge_segment(
            &mut commands,
            &mut meshes,
            guide_material,
            from,
            to,
            CLOSING_GUIDE_WIDTH,
            FOOTPRINT_EDGE_HEIGHT,
            FootprintPreview,
        );
    }
}
