use bevy::prelude::*;

/// Fallible flat-polygon and extruded-solid mesh construction.
pub mod geometry;

/// Ray tests for selection-for-extrusion.
pub mod picking;

/// Promotion systems: footprint close, click-to-extrude, reset.
pub mod promote;

/// The shape registry and its one-way `Flat -> Extruded` lifecycle.
pub mod registry;

/// Registers the shape registry; the promotion systems are scheduled by app
/// setup together with the footprint systems.
pub struct MassingToolPlugin;

impl Plugin for MassingToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<registry::ShapeRegistry>();
    }
}
