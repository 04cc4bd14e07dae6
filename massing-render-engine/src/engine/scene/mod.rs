//! Scene content: the drawable ground plane and the lighting rig.

/// Satellite ground plane with fallback material handling.
pub mod ground;

/// Ambient and directional lighting.
pub mod lighting;
