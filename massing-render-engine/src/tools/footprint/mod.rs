use bevy::prelude::*;

/// Pointer input routing into the drawing session.
pub mod input;

/// Pure derivation of the transient preview segments.
pub mod preview;

/// Rebuild-from-state rendering of markers, edges, and previews.
pub mod render;

/// The footprint drawing state machine.
pub mod session;

/// Registers the drawing session state and its events; the systems are
/// scheduled by app setup so their ordering is visible in one place.
pub struct FootprintToolPlugin;

impl Plugin for FootprintToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<session::DrawingSession>()
            .init_resource::<input::FootprintCursor>()
            .add_event::<input::FootprintClosedEvent>()
            .add_event::<input::ShapePickEvent>();
    }
}
