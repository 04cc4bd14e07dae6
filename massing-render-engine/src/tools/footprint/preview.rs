use bevy::prelude::*;

use super::session::DrawMode;

/// Transient preview line segments derived from the current pointer position.
///
/// Always recomputed, never stored: the render system discards and replaces
/// the preview entities every frame, so the segments here carry no identity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreviewSegments {
    /// Edge from the last placed vertex to the pointer ground position.
    pub active: Option<[Vec2; 2]>,
    /// Guide from the pointer ground position back to the first vertex,
    /// rendered visually distinguished from the active edge.
    pub closing: Option<[Vec2; 2]>,
}

impl PreviewSegments {
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.closing.is_none()
    }
}

/// Derive the preview segments for the current frame.
///
/// The active edge exists whenever drawing is in progress and at least one
/// vertex is placed; the closing guide additionally requires two or more
/// vertices. Outside `Drawing` mode, or with no cursor intersection, no
/// segments exist.
pub fn preview_segments(mode: DrawMode, points: &[Vec2], cursor: Option<Vec2>) -> PreviewSegments {
    if mode != DrawMode::Drawing || points.is_empty() {
        return PreviewSegments::default();
    }
    let Some(cursor) = cursor else {
        return PreviewSegments::default();
    };

    let last = points[points.len() - 1];
    let active = Some([last, cursor]);

    let closing = if points.len() >= 2 {
        Some([cursor, points[0]])
    } else {
        None
    };

    PreviewSegments { active, closing }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, z: f32) -> Vec2 {
        Vec2::new(x, z)
    }

    #[test]
    fn single_point_yields_active_edge_only() {
        let segments = preview_segments(DrawMode::Drawing, &[v(0.0, 0.0)], Some(v(5.0, 5.0)));
        assert_eq!(segments.active, Some([v(0.0, 0.0), v(5.0, 5.0)]));
        assert_eq!(segments.closing, None);
    }

    #[test]
    fn second_point_adds_closing_guide() {
        let points = [v(0.0, 0.0), v(2.0, 2.0)];
        let segments = preview_segments(DrawMode::Drawing, &points, Some(v(5.0, 5.0)));
        assert_eq!(segments.active, Some([v(2.0, 2.0), v(5.0, 5.0)]));
        assert_eq!(segments.closing, Some([v(5.0, 5.0), v(0.0, 0.0)]));
    }

    #[test]
    fn idle_mode_yields_nothing() {
        let points = [v(0.0, 0.0), v(2.0, 2.0)];
        let segments = preview_segments(DrawMode::Idle, &points, Some(v(5.0, 5.0)));
        assert!(segments.is_empty());
    }

    #[test]
    fn no_points_yields_nothing() {
        let segments = preview_segments(DrawMode::Drawing, &[], Some(v(5.0, 5.0)));
        assert!(segments.is_empty());
    }

    #[test]
    fn missing_cursor_yields_nothing() {
        let points = [v(0.0, 0.0), v(2.0, 2.0)];
        assert!(preview_segments(DrawMode::Drawing, &points, None).is_empty());
    }
}
