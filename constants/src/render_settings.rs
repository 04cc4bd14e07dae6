use bevy::prelude::*;

/// Orbit camera tuning shared by native and wasm builds.
#[derive(Resource, Clone, Copy)]
pub struct OrbitSettings {
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

pub const ORBIT_SETTINGS: OrbitSettings = OrbitSettings {
    rotate_speed: 0.01,
    pan_speed: 0.05,
    zoom_speed: 0.1,
    min_radius: 10.0,
    max_radius: 500.0,
};

pub const DRAW_LINE_WIDTH: f32 = 0.076;
pub const DRAW_VERTEX_SIZE: f32 = 0.5;
pub const PREVIEW_LINE_WIDTH: f32 = 0.05;
pub const CLOSING_GUIDE_WIDTH: f32 = 0.03;
pub const MOUSE_RAYCAST_INTERSECTION_SPHERE_SIZE: f32 = 0.125;
