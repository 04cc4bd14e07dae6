use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use constants::drawing::{MIN_EDGE_LENGTH, MIN_FOOTPRINT_POINTS};
use thiserror::Error;

/// Errors produced while turning a footprint outline into renderable geometry.
///
/// All of these are recoverable: the caller reports them to the user and
/// leaves session and registry state untouched.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("a footprint needs at least {MIN_FOOTPRINT_POINTS} points, got {0}")]
    TooFewPoints(usize),

    #[error("footprint outline has a degenerate edge at vertex {0}")]
    DegenerateEdge(usize),

    #[error("footprint outline encloses no area")]
    ZeroArea,

    #[error("footprint outline intersects itself")]
    SelfIntersecting,
}

/// Errors produced when promoting a flat shape into a solid.
#[derive(Debug, Error, PartialEq)]
pub enum ExtrudeError {
    #[error("building height must be greater than zero, got {0}")]
    NonPositiveHeight(f32),

    #[error("shape {0} is already extruded")]
    AlreadyExtruded(u32),

    #[error("no shape with id {0}")]
    UnknownShape(u32),
}

/// Twice the signed area of the outline in the ground plane.
///
/// Positive means the vertex order produces downward-facing fills with the
/// fan triangulation used below; builders reverse such outlines first.
pub fn signed_area_doubled(points: &[Vec2]) -> f32 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

/// Proper segment-segment intersection in the ground plane.
///
/// Shared endpoints between adjacent outline edges are excluded by the
/// caller, so touching at endpoints counts as an intersection here.
fn segments_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let orient = |p: Vec2, q: Vec2, r: Vec2| (q - p).perp_dot(r - p);

    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    let on_segment = |p: Vec2, q: Vec2, r: Vec2| {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };

    (d1 == 0.0 && on_segment(b0, b1, a0))
        || (d2 == 0.0 && on_segment(b0, b1, a1))
        || (d3 == 0.0 && on_segment(a0, a1, b0))
        || (d4 == 0.0 && on_segment(a0, a1, b1))
}

/// Validate a footprint outline before any mesh is built.
///
/// Rejects outlines with fewer than three vertices, degenerate edges,
/// near-zero enclosed area, and self-intersections between non-adjacent
/// edges of the closed loop.
pub fn validate_outline(points: &[Vec2]) -> Result<(), GeometryError> {
    let n = points.len();
    if n < MIN_FOOTPRINT_POINTS {
        return Err(GeometryError::TooFewPoints(n));
    }

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if a.distance(b) < MIN_EDGE_LENGTH {
            return Err(GeometryError::DegenerateEdge(i));
        }
    }

    if signed_area_doubled(points).abs() < MIN_EDGE_LENGTH {
        return Err(GeometryError::ZeroArea);
    }

    for i in 0..n {
        for j in (i + 2)..n {
            // Skip adjacent edges, including the wrap-around pair.
            if i == 0 && j == n - 1 {
                continue;
            }
            let a0 = points[i];
            let a1 = points[(i + 1) % n];
            let b0 = points[j];
            let b1 = points[(j + 1) % n];
            if segments_intersect(a0, a1, b0, b1) {
                return Err(GeometryError::SelfIntersecting);
            }
        }
    }

    Ok(())
}

/// Outline with winding normalised so fills built from it face upward.
fn oriented(points: &[Vec2]) -> Vec<Vec2> {
    let mut pts = points.to_vec();
    if signed_area_doubled(&pts) > 0.0 {
        pts.reverse();
    }
    pts
}

/// Build the filled flat polygon mesh for a completed footprint.
///
/// The mesh lies in the ground plane at `y_offset` with upward-facing
/// normals. Fan triangulation from the first vertex, suitable for convex
/// and simple concave outlines; anything the validation rejects never
/// reaches this point.
pub fn build_flat_shape(points: &[Vec2], y_offset: f32) -> Result<Mesh, GeometryError> {
    validate_outline(points)?;
    let pts = oriented(points);

    let vertices: Vec<[f32; 3]> = pts.iter().map(|p| [p.x, y_offset, p.y]).collect();
    let normals: Vec<[f32; 3]> = (0..pts.len()).map(|_| [0.0, 1.0, 0.0]).collect();

    let mut indices = Vec::new();
    for i in 1..(pts.len() - 1) {
        indices.extend_from_slice(&[0, i as u32, (i + 1) as u32]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(bevy::render::mesh::Indices::U32(indices));

    Ok(mesh)
}

/// Build the extruded solid mesh for a footprint and a building height.
///
/// The solid spans from the ground plane up to `height`: one wall quad per
/// outline edge plus a fan-triangulated roof cap. The base is left open
/// since it sits on the imagery plane.
pub fn build_extruded_solid(points: &[Vec2], height: f32) -> Result<Mesh, GeometryError> {
    validate_outline(points)?;
    let pts = oriented(points);
    let n = pts.len();

    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(n * 4 + n);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n * 4 + n);
    let mut indices: Vec<u32> = Vec::new();

    // Walls: four vertices per edge so each quad keeps a flat normal.
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let dir = (b - a).normalize();
        // Outward horizontal normal for the upward-facing winding.
        let normal = [-dir.y, 0.0, dir.x];

        let base = vertices.len() as u32;
        vertices.push([a.x, 0.0, a.y]);
        vertices.push([b.x, 0.0, b.y]);
        vertices.push([b.x, height, b.y]);
        vertices.push([a.x, height, a.y]);
        for _ in 0..4 {
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    // Roof cap at the extrusion height.
    let roof_base = vertices.len() as u32;
    for p in &pts {
        vertices.push([p.x, height, p.y]);
        normals.push([0.0, 1.0, 0.0]);
    }
    for i in 1..(n - 1) {
        indices.extend_from_slice(&[roof_base, roof_base + i as u32, roof_base + i as u32 + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(bevy::render::mesh::Indices::U32(indices));

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, z: f32) -> Vec2 {
        Vec2::new(x, z)
    }

    fn square() -> Vec<Vec2> {
        vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)]
    }

    #[test]
    fn rejects_fewer_than_three_points() {
        assert_eq!(
            validate_outline(&[v(0.0, 0.0), v(1.0, 0.0)]),
            Err(GeometryError::TooFewPoints(2))
        );
        assert_eq!(validate_outline(&[]), Err(GeometryError::TooFewPoints(0)));
    }

    #[test]
    fn rejects_duplicate_consecutive_vertices() {
        let outline = [v(0.0, 0.0), v(0.0, 0.0), v(1.0, 1.0)];
        assert_eq!(
            validate_outline(&outline),
            Err(GeometryError::DegenerateEdge(0))
        );
    }

    #[test]
    fn rejects_collinear_outline() {
        let outline = [v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)];
        assert!(matches!(
            validate_outline(&outline),
            Err(GeometryError::ZeroArea) | Err(GeometryError::SelfIntersecting)
        ));
    }

    #[test]
    fn rejects_bowtie_outline() {
        // Two crossing edges: (0,0)->(10,10) and (10,0)->(0,10).
        let outline = [v(0.0, 0.0), v(10.0, 10.0), v(10.0, 0.0), v(0.0, 10.0)];
        assert_eq!(
            validate_outline(&outline),
            Err(GeometryError::SelfIntersecting)
        );
    }

    #[test]
    fn accepts_simple_outlines_in_either_winding() {
        let mut outline = square();
        assert_eq!(validate_outline(&outline), Ok(()));
        outline.reverse();
        assert_eq!(validate_outline(&outline), Ok(()));
    }

    #[test]
    fn flat_shape_mesh_has_expected_counts() {
        let mesh = build_flat_shape(&square(), 0.1).unwrap();
        assert_eq!(mesh.count_vertices(), 4);
        // n - 2 triangles from the fan.
        assert_eq!(mesh.indices().unwrap().len(), 6);
    }

    #[test]
    fn flat_shape_fails_without_mesh_side_effects() {
        assert!(build_flat_shape(&[v(0.0, 0.0), v(1.0, 0.0)], 0.1).is_err());
    }

    #[test]
    fn extruded_solid_has_walls_and_roof() {
        let mesh = build_extruded_solid(&square(), 5.0).unwrap();
        // 4 wall quads * 4 vertices + 4 roof vertices.
        assert_eq!(mesh.count_vertices(), 20);
        // 4 wall quads * 6 indices + 2 roof triangles * 3 indices.
        assert_eq!(mesh.indices().unwrap().len(), 30);
    }

    #[test]
    fn roof_sits_at_extrusion_height() {
        let mesh = build_extruded_solid(&square(), 7.5).unwrap();
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .unwrap()
            .as_float3()
            .unwrap();
        let max_y = positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 7.5).abs() < 1e-6);
    }
}
