//! Integration tests for the drawing-to-massing flow.
//!
//! Drives the session, registry, and geometry builders headlessly, the same
//! way the input and promotion systems do, without a window or renderer.

use bevy::math::{Vec2, Vec3};

use massing_render_engine::tools::footprint::preview::preview_segments;
use massing_render_engine::tools::footprint::session::{
    DrawMode, DrawingSession, PlacePointOutcome,
};
use massing_render_engine::tools::massing::geometry::{
    ExtrudeError, build_flat_shape, validate_outline,
};
use massing_render_engine::tools::massing::picking::pick_shape;
use massing_render_engine::tools::massing::registry::ShapeRegistry;

fn v(x: f32, z: f32) -> Vec2 {
    Vec2::new(x, z)
}

/// Draw a 20x20 square footprint and close it with a click near the origin.
fn draw_closed_square(session: &mut DrawingSession) -> Vec<Vec2> {
    session.toggle_drawing();
    for p in [v(0.0, 0.0), v(20.0, 0.0), v(20.0, 20.0), v(0.0, 20.0)] {
        session.place_point(p);
    }
    match session.place_point(v(0.4, 0.4)) {
        PlacePointOutcome::Closed { points } => points,
        other => panic!("square should close, got {other:?}"),
    }
}

#[test]
fn full_flow_draw_close_register_extrude() {
    let mut session = DrawingSession::default();
    let mut registry = ShapeRegistry::default();

    let points = draw_closed_square(&mut session);
    assert_eq!(points.len(), 4);
    assert_eq!(session.mode(), DrawMode::Idle);

    // Promotion: build first, register only on success.
    assert!(build_flat_shape(&points, 0.1).is_ok());
    let id = registry.add_flat(points);
    assert!(registry.get(id).unwrap().is_flat());

    registry.extrude(id, 15.0).unwrap();
    assert_eq!(registry.get(id).unwrap().height(), Some(15.0));

    // The one-way guard leaves the first extrusion in place.
    assert_eq!(
        registry.extrude(id, 30.0),
        Err(ExtrudeError::AlreadyExtruded(id))
    );
    assert_eq!(registry.get(id).unwrap().height(), Some(15.0));
}

#[test]
fn short_outlines_never_reach_the_registry() {
    let mut session = DrawingSession::default();
    let registry = ShapeRegistry::default();

    session.toggle_drawing();
    session.place_point(v(0.0, 0.0));
    session.place_point(v(10.0, 0.0));

    // Two points cannot close, whatever the click position.
    assert!(!session.would_close(v(0.1, 0.1)));
    assert_eq!(
        session.place_point(v(0.1, 0.1)),
        PlacePointOutcome::Appended { index: 2 }
    );

    // And the geometry boundary rejects them outright, registry untouched.
    assert!(build_flat_shape(&[v(0.0, 0.0), v(10.0, 0.0)], 0.1).is_err());
    assert!(registry.is_empty());
}

#[test]
fn preview_segment_counts_track_placed_points() {
    let mut session = DrawingSession::default();
    session.toggle_drawing();
    session.place_point(v(0.0, 0.0));

    let one_point = preview_segments(session.mode(), session.points(), Some(v(5.0, 5.0)));
    assert!(one_point.active.is_some());
    assert!(one_point.closing.is_none());

    session.place_point(v(2.0, 2.0));
    let two_points = preview_segments(session.mode(), session.points(), Some(v(5.0, 5.0)));
    assert!(two_points.active.is_some());
    assert!(two_points.closing.is_some());

    // Toggling drawing off discards both segments but keeps the points.
    session.toggle_drawing();
    let idle = preview_segments(session.mode(), session.points(), Some(v(5.0, 5.0)));
    assert!(idle.is_empty());
    assert_eq!(session.points().len(), 2);
}

#[test]
fn idle_click_extrudes_the_picked_flat_shape_once() {
    let mut session = DrawingSession::default();
    let mut registry = ShapeRegistry::default();

    let points = draw_closed_square(&mut session);
    let id = registry.add_flat(points);

    // Idle click from above the footprint: the pick resolves to the shape.
    let origin = Vec3::new(10.0, 50.0, 10.0);
    let picked = pick_shape(origin, Vec3::NEG_Y, registry.shapes()).unwrap();
    assert_eq!(picked, id);
    registry.extrude(picked, 12.0).unwrap();

    // A second click still hits the (now solid) shape, but it is no longer
    // flat, so the promotion path ignores it.
    let picked_again = pick_shape(origin, Vec3::NEG_Y, registry.shapes()).unwrap();
    assert_eq!(picked_again, id);
    assert!(!registry.get(picked_again).unwrap().is_flat());
}

#[test]
fn invalid_close_leaves_the_session_unchanged() {
    let mut session = DrawingSession::default();
    session.toggle_drawing();

    // Bowtie outline: the close click is within threshold but validation
    // fails, so the input path refuses to seal it.
    for p in [v(0.0, 0.0), v(10.0, 10.0), v(10.0, 0.0), v(0.0, 10.0)] {
        session.place_point(p);
    }
    let close_click = v(0.5, 0.5);
    assert!(session.would_close(close_click));
    assert!(validate_outline(session.points()).is_err());

    // The caller bails before place_point, exactly as footprint_input_system
    // does; drawing continues with the same four points.
    assert_eq!(session.mode(), DrawMode::Drawing);
    assert_eq!(session.points().len(), 4);
}

#[test]
fn reset_returns_everything_to_idle() {
    let mut session = DrawingSession::default();
    let mut registry = ShapeRegistry::default();

    let points = draw_closed_square(&mut session);
    let id = registry.add_flat(points);
    registry.extrude(id, 5.0).unwrap();

    session.toggle_drawing();
    session.place_point(v(50.0, 50.0));

    // Reset action: registry cleared, session idle and empty.
    registry.clear();
    session.reset();

    assert!(registry.is_empty());
    assert_eq!(session.mode(), DrawMode::Idle);
    assert!(session.points().is_empty());
    assert!(pick_shape(Vec3::new(10.0, 50.0, 10.0), Vec3::NEG_Y, registry.shapes()).is_none());
}
