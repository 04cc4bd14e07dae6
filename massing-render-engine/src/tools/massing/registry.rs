use bevy::prelude::*;

use super::geometry::ExtrudeError;

/// Lifecycle of a registered shape. The transition is one-way: a shape is
/// created `Flat` when its footprint closes and becomes `Extruded` at most
/// once, never the other way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeState {
    Flat,
    Extruded { height: f32 },
}

/// A closed footprint promoted from a completed drawing session.
///
/// The visual primitives created while drawing it (point markers, edge
/// lines, fill or solid meshes) are ECS entities tagged with this shape's
/// id, which is how extrusion finds and repositions them.
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: u32,
    pub points: Vec<Vec2>,
    pub state: ShapeState,
}

impl Shape {
    pub fn is_flat(&self) -> bool {
        self.state == ShapeState::Flat
    }

    pub fn height(&self) -> Option<f32> {
        match self.state {
            ShapeState::Flat => None,
            ShapeState::Extruded { height } => Some(height),
        }
    }

    /// Axis-aligned footprint bounds in the ground plane.
    pub fn footprint_bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::INFINITY;
        let mut max = Vec2::NEG_INFINITY;
        for p in &self.points {
            min = min.min(*p);
            max = max.max(*p);
        }
        (min, max)
    }
}

/// Registry of all shapes alive in the scene.
///
/// The registry decides what exists; the render systems decide how it is
/// drawn. Ids are allocated monotonically and never reused within a run.
#[derive(Resource, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
    next_id: u32,
}

impl ShapeRegistry {
    /// Register a freshly closed footprint as a flat shape.
    ///
    /// The points must already have passed outline validation; the caller
    /// builds the fill mesh first so that a geometry failure never leaves a
    /// partial entry behind.
    pub fn add_flat(&mut self, points: Vec<Vec2>) -> u32 {
        debug_assert!(points.len() >= 3);
        let id = self.next_id;
        self.next_id += 1;
        self.shapes.push(Shape {
            id,
            points,
            state: ShapeState::Flat,
        });
        id
    }

    /// Promote a flat shape to an extruded solid of the given height.
    ///
    /// Fails without mutation when the height is not positive, the shape is
    /// unknown, or the shape is already extruded; the state guard is what
    /// makes a second extrusion of the same shape a no-op for the scene.
    pub fn extrude(&mut self, id: u32, height: f32) -> Result<(), ExtrudeError> {
        if !(height > 0.0) {
            return Err(ExtrudeError::NonPositiveHeight(height));
        }
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ExtrudeError::UnknownShape(id))?;
        if !shape.is_flat() {
            return Err(ExtrudeError::AlreadyExtruded(id));
        }
        shape.state = ShapeState::Extruded { height };
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Most recently closed shape that is still flat, if any. This is the
    /// shape the explicit extrude action applies to.
    pub fn latest_flat(&self) -> Option<&Shape> {
        self.shapes.iter().rev().find(|s| s.is_flat())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop every shape. Used by the reset action together with despawning
    /// all tagged visuals.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ]
    }

    #[test]
    fn ids_are_monotonic() {
        let mut registry = ShapeRegistry::default();
        let a = registry.add_flat(triangle());
        let b = registry.add_flat(triangle());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn extrude_is_a_one_way_transition() {
        let mut registry = ShapeRegistry::default();
        let id = registry.add_flat(triangle());

        assert_eq!(registry.extrude(id, 12.0), Ok(()));
        assert_eq!(registry.get(id).unwrap().height(), Some(12.0));

        // A second extrusion is rejected by the state guard and changes nothing.
        assert_eq!(registry.extrude(id, 20.0), Err(ExtrudeError::AlreadyExtruded(id)));
        assert_eq!(registry.get(id).unwrap().height(), Some(12.0));
    }

    #[test]
    fn extrude_rejects_non_positive_heights() {
        let mut registry = ShapeRegistry::default();
        let id = registry.add_flat(triangle());

        assert_eq!(registry.extrude(id, 0.0), Err(ExtrudeError::NonPositiveHeight(0.0)));
        assert_eq!(registry.extrude(id, -3.0), Err(ExtrudeError::NonPositiveHeight(-3.0)));
        assert!(registry.get(id).unwrap().is_flat());
    }

    #[test]
    fn extrude_rejects_unknown_ids() {
        let mut registry = ShapeRegistry::default();
        assert_eq!(registry.extrude(7, 5.0), Err(ExtrudeError::UnknownShape(7)));
    }

    #[test]
    fn latest_flat_skips_extruded_shapes() {
        let mut registry = ShapeRegistry::default();
        let first = registry.add_flat(triangle());
        let second = registry.add_flat(triangle());

        registry.extrude(second, 5.0).unwrap();
        assert_eq!(registry.latest_flat().map(|s| s.id), Some(first));

        registry.extrude(first, 5.0).unwrap();
        assert!(registry.latest_flat().is_none());
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut registry = ShapeRegistry::default();
        registry.add_flat(triangle());
        registry.clear();
        assert!(registry.is_empty());
    }
}
