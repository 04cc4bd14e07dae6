//! Interactive tools for footprint drawing and building massing.
//!
//! Provides the polygon footprint drawing session, transient preview
//! rendering, and the shape registry that promotes closed footprints into
//! flat polygons and extruded solids, with RPC integration for frontend
//! control.
//!
//! ## Drawing Workflow
//!
//! ```text
//! ToggleDrawing (keyboard or RPC)
//!   └─> DrawingSession: Idle -> Drawing (leftover points cleared)
//!       └─> Left click with ground intersection
//!           ├─> append vertex, rebuild markers/edges from state
//!           └─> click near first vertex (> 2 placed) seals the loop
//!               └─> FootprintClosedEvent -> flat shape registered
//! ```
//!
//! While idle, a left click is ray-tested against all registered shapes:
//! a flat hit extrudes with the configured height, an extruded hit is
//! ignored. The explicit extrude action applies to the most recently
//! closed flat shape instead.
//!
//! ## Cross-Platform Considerations
//!
//! Native builds use keyboard shortcuts (`D` toggle drawing, `E` extrude,
//! `R` reset, arrow keys step the height) and a status-text overlay. WASM
//! builds are controlled entirely by the React frontend via JSON-RPC, and
//! every state change is broadcast back as a notification.

/// Footprint drawing session, preview derivation, input routing, and
/// rebuild-from-state rendering of in-progress visuals.
pub mod footprint;

/// Shape registry, fallible polygon/solid geometry, picking, and the
/// promotion systems that turn closed footprints into massing models.
pub mod massing;

/// Massing actions, height settings, status line, and keyboard shortcuts.
pub mod tool_manager;
