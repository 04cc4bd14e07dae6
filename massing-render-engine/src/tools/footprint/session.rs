use bevy::prelude::*;
use constants::drawing::CLOSE_THRESHOLD;

/// Drawing mode of the footprint tool.
///
/// `Idle` clicks are routed to shape picking for extrusion; `Drawing` clicks
/// place footprint vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Idle,
    Drawing,
}

/// Result of feeding a ground-plane click into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacePointOutcome {
    /// The click appended a new vertex at `index`.
    Appended { index: usize },
    /// The click landed within the close threshold of the first vertex and
    /// sealed the polygon. The session hands over its points and returns to
    /// `Idle`; the caller promotes them into a shape.
    Closed { points: Vec<Vec2> },
}

/// Interactive footprint drawing session.
///
/// Owns the ordered list of placed ground points and the drawing mode.
/// Exactly one session exists at a time, created at scene init and reset
/// whenever drawing restarts. All coordinates are ground-plane (x, z);
/// vertical layering offsets are applied by the render systems only.
#[derive(Resource)]
pub struct DrawingSession {
    points: Vec<Vec2>,
    mode: DrawMode,
    close_threshold: f32,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            mode: DrawMode::Idle,
            close_threshold: CLOSE_THRESHOLD,
        }
    }
}

impl DrawingSession {
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == DrawMode::Drawing
    }

    /// Placed vertices of the in-progress footprint, in placement order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn close_threshold(&self) -> f32 {
        self.close_threshold
    }

    /// Toggle between `Idle` and `Drawing`, returning the new mode.
    ///
    /// Entering `Drawing` discards leftover points of a prior unfinished
    /// drawing. Leaving `Drawing` via toggle aborts point placement but keeps
    /// the already placed points as-is.
    pub fn toggle_drawing(&mut self) -> DrawMode {
        match self.mode {
            DrawMode::Idle => {
                self.points.clear();
                self.mode = DrawMode::Drawing;
            }
            DrawMode::Drawing => {
                self.mode = DrawMode::Idle;
            }
        }
        self.mode
    }

    /// Whether a click at `ground` would seal the polygon: more than two
    /// vertices placed and the click within the close threshold of the first
    /// vertex, measured in the ground plane only.
    pub fn would_close(&self, ground: Vec2) -> bool {
        self.points.len() > 2 && ground.distance(self.points[0]) < self.close_threshold
    }

    /// Feed a ground-plane click into the session.
    ///
    /// Precondition: `mode == Drawing`. The caller is responsible for
    /// discarding clicks with no ground intersection, clicks from
    /// non-primary buttons, and clicks made while `Idle`.
    ///
    /// A click within `close_threshold` of the first vertex closes the loop,
    /// provided more than two vertices are placed. Any other click appends a
    /// vertex.
    pub fn place_point(&mut self, ground: Vec2) -> PlacePointOutcome {
        debug_assert_eq!(self.mode, DrawMode::Drawing);

        if self.would_close(ground) {
            let points = std::mem::take(&mut self.points);
            self.mode = DrawMode::Idle;
            return PlacePointOutcome::Closed { points };
        }

        self.points.push(ground);
        PlacePointOutcome::Appended {
            index: self.points.len() - 1,
        }
    }

    /// Clear all placed points and return to `Idle`.
    pub fn reset(&mut self) {
        self.points.clear();
        self.mode = DrawMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, z: f32) -> Vec2 {
        Vec2::new(x, z)
    }

    fn drawing_session_with(points: &[Vec2]) -> DrawingSession {
        let mut session = DrawingSession::default();
        session.toggle_drawing();
        for p in points {
            session.place_point(*p);
        }
        session
    }

    #[test]
    fn starts_idle_and_empty() {
        let session = DrawingSession::default();
        assert_eq!(session.mode(), DrawMode::Idle);
        assert!(session.points().is_empty());
    }

    #[test]
    fn click_near_first_point_closes_the_loop() {
        let mut session = drawing_session_with(&[v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0)]);

        // Distance to (0, 0) is ~0.707, well inside the 3.0 threshold.
        let outcome = session.place_point(v(0.5, 0.5));
        match outcome {
            PlacePointOutcome::Closed { points } => {
                assert_eq!(points.len(), 3);
                assert_eq!(points[0], v(0.0, 0.0));
            }
            other => panic!("expected close, got {other:?}"),
        }
        assert_eq!(session.mode(), DrawMode::Idle);
        assert!(session.points().is_empty());
    }

    #[test]
    fn click_outside_threshold_appends_instead_of_closing() {
        let mut session = drawing_session_with(&[v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0)]);

        // Distance to (0, 0) is ~6.36, outside the threshold.
        let outcome = session.place_point(v(5.0, 5.0));
        assert_eq!(outcome, PlacePointOutcome::Appended { index: 3 });
        assert_eq!(session.points().len(), 4);
        assert_eq!(session.mode(), DrawMode::Drawing);
    }

    #[test]
    fn near_first_click_does_not_close_with_two_points() {
        // Closing requires more than two placed vertices.
        let mut session = drawing_session_with(&[v(0.0, 0.0), v(10.0, 0.0)]);

        let outcome = session.place_point(v(0.5, 0.5));
        assert_eq!(outcome, PlacePointOutcome::Appended { index: 2 });
        assert_eq!(session.mode(), DrawMode::Drawing);
    }

    #[test]
    fn toggle_off_keeps_placed_points() {
        let mut session = drawing_session_with(&[v(0.0, 0.0), v(10.0, 0.0)]);

        assert_eq!(session.toggle_drawing(), DrawMode::Idle);
        assert_eq!(session.points().len(), 2);
    }

    #[test]
    fn restarting_drawing_discards_leftover_points() {
        let mut session = drawing_session_with(&[v(0.0, 0.0), v(10.0, 0.0)]);
        session.toggle_drawing();

        assert_eq!(session.toggle_drawing(), DrawMode::Drawing);
        assert!(session.points().is_empty());
    }

    #[test]
    fn reset_clears_points_and_mode() {
        let mut session = drawing_session_with(&[v(0.0, 0.0), v(10.0, 0.0), v(5.0, 5.0)]);
        session.reset();
        assert_eq!(session.mode(), DrawMode::Idle);
        assert!(session.points().is_empty());
    }
}
