use bevy::prelude::*;

use super::registry::{Shape, ShapeState};

/// Intersect a ray with the ground plane at `y = 0`.
///
/// Returns the hit distance along the ray, or `None` for rays parallel to
/// the plane or pointing away from it.
pub fn ray_ground_plane_t(origin: Vec3, direction: Vec3) -> Option<f32> {
    if direction.y.abs() < 0.001 {
        return None;
    }
    let t = -origin.y / direction.y;
    if t > 0.0 { Some(t) } else { None }
}

/// Even-odd point-in-polygon test in the ground plane.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Slab-method ray-AABB intersection, returns the nearest non-negative hit
/// distance or `None`.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax {
        std::mem::swap(&mut tmin, &mut tmax);
    }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax {
        std::mem::swap(&mut tymin, &mut tymax);
    }

    if (tmin > tymax) || (tymin > tmax) {
        return None;
    }
    if tymin > tmin {
        tmin = tymin;
    }
    if tymax < tmax {
        tmax = tymax;
    }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax {
        std::mem::swap(&mut tzmin, &mut tzmax);
    }

    if (tmin > tzmax) || (tzmin > tmax) {
        return None;
    }
    if tzmin > tmin {
        tmin = tzmin;
    }
    if tzmax < tmax {
        tmax = tzmax;
    }

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Hit distance of a pointer ray against a single shape.
///
/// Flat shapes are tested where they live, on the ground plane, with a
/// point-in-polygon test at the plane hit. Extruded shapes are tested
/// against the axis-aligned bounds of their solid volume.
pub fn ray_hits_shape(origin: Vec3, direction: Vec3, shape: &Shape) -> Option<f32> {
    let (min, max) = shape.footprint_bounds();
    match shape.state {
        ShapeState::Flat => {
            let t = ray_ground_plane_t(origin, direction)?;
            let hit = origin + direction * t;
            point_in_polygon(Vec2::new(hit.x, hit.z), &shape.points).then_some(t)
        }
        ShapeState::Extruded { height } => ray_aabb_hit_t(
            origin,
            direction,
            Vec3::new(min.x, 0.0, min.y),
            Vec3::new(max.x, height, max.y),
        ),
    }
}

/// Nearest shape under the pointer ray, if any.
pub fn pick_shape(origin: Vec3, direction: Vec3, shapes: &[Shape]) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;
    for shape in shapes {
        if let Some(t) = ray_hits_shape(origin, direction, shape) {
            if best.is_none() || t < best.unwrap().1 {
                best = Some((shape.id, t));
            }
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, z: f32) -> Vec2 {
        Vec2::new(x, z)
    }

    fn flat_square(id: u32) -> Shape {
        Shape {
            id,
            points: vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)],
            state: ShapeState::Flat,
        }
    }

    #[test]
    fn point_in_polygon_square() {
        let poly = [v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)];
        assert!(point_in_polygon(v(5.0, 5.0), &poly));
        assert!(!point_in_polygon(v(15.0, 5.0), &poly));
        assert!(!point_in_polygon(v(-1.0, -1.0), &poly));
    }

    #[test]
    fn downward_ray_hits_flat_shape() {
        let shape = flat_square(0);
        let t = ray_hits_shape(Vec3::new(5.0, 20.0, 5.0), Vec3::NEG_Y, &shape);
        assert_eq!(t, Some(20.0));
    }

    #[test]
    fn downward_ray_misses_outside_footprint() {
        let shape = flat_square(0);
        assert!(ray_hits_shape(Vec3::new(50.0, 20.0, 5.0), Vec3::NEG_Y, &shape).is_none());
    }

    #[test]
    fn extruded_shape_is_hit_on_its_volume() {
        let mut shape = flat_square(0);
        shape.state = ShapeState::Extruded { height: 8.0 };

        // Horizontal ray at y = 4 crosses the solid but not the ground plane.
        let t = ray_hits_shape(Vec3::new(-5.0, 4.0, 5.0), Vec3::X, &shape);
        assert_eq!(t, Some(5.0));

        // Above the roof the same ray misses.
        assert!(ray_hits_shape(Vec3::new(-5.0, 9.0, 5.0), Vec3::X, &shape).is_none());
    }

    #[test]
    fn pick_prefers_the_nearest_hit() {
        let near = Shape {
            id: 1,
            points: vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(0.0, 4.0)],
            state: ShapeState::Extruded { height: 10.0 },
        };
        let far = flat_square(2);

        // Slanted ray from above; it enters the extruded volume before it
        // could reach the ground plane.
        let origin = Vec3::new(2.0, 20.0, -10.0);
        let direction = (Vec3::new(2.0, 0.0, 2.0) - origin).normalize();
        assert_eq!(pick_shape(origin, direction, &[far, near]), Some(1));
    }

    #[test]
    fn pick_returns_none_on_empty_registry() {
        assert_eq!(pick_shape(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, &[]), None);
    }
}
