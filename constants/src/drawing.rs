/// Ground-plane distance within which a click on the first placed point
/// closes the footprint loop (plane units)
pub const CLOSE_THRESHOLD: f32 = 3.0;

/// Minimum vertex count for a valid footprint polygon
pub const MIN_FOOTPRINT_POINTS: usize = 3;

/// Edges shorter than this are considered degenerate during outline validation
pub const MIN_EDGE_LENGTH: f32 = 1e-3;

/// Vertical offset applied to edge lines and fill meshes so they render
/// above the imagery plane without z-fighting
pub const FOOTPRINT_EDGE_HEIGHT: f32 = 0.1;

/// Vertical offset applied to vertex markers while a footprint is drawn or flat
pub const POINT_MARKER_LIFT: f32 = 0.5;

/// Extrusion height used when the frontend has not configured one (metres)
pub const DEFAULT_BUILDING_HEIGHT: f32 = 10.0;
