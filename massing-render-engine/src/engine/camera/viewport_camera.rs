use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::render_settings::OrbitSettings;

/// Orbit camera over the site plane.
///
/// Spherical coordinates around a pannable target: `phi` is the polar angle
/// from straight up, `theta` the azimuth. Pointer input mutates this
/// resource; `camera_controller` applies it to the camera transform each
/// frame with a short smoothing lerp.
#[derive(Resource)]
pub struct ViewportCamera {
    pub target: Vec3,
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
    pub is_orbiting: bool,
    pub is_panning: bool,
    pub ground_height: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 120.0,
            phi: std::f32::consts::FRAC_PI_6,
            theta: 0.0,
            is_orbiting: false,
            is_panning: false,
            ground_height: 0.0,
        }
    }
}

impl ViewportCamera {
    /// Frame a square site plane of the given side length.
    pub fn with_plane_size(size: f32) -> Self {
        Self {
            radius: size * 1.2,
            ..Default::default()
        }
    }

    /// Camera position derived from the current spherical coordinates.
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.target.x + self.radius * self.phi.sin() * self.theta.cos(),
            self.target.y + self.radius * self.phi.cos(),
            self.target.z + self.radius * self.phi.sin() * self.theta.sin(),
        )
    }

    /// Project a cursor position onto the drawing plane.
    ///
    /// Returns the world-space intersection of the pointer ray with the
    /// ground plane, or `None` when the ray misses (grazing angles, cursor
    /// outside the viewport).
    pub fn mouse_to_ground_plane(
        &self,
        cursor_pos: Vec2,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) -> Option<Vec3> {
        let ray = camera.viewport_to_world(camera_transform, cursor_pos).ok()?;
        self.flat_plane_intersection(&ray)
    }

    fn flat_plane_intersection(&self, ray: &Ray3d) -> Option<Vec3> {
        let plane_y = self.ground_height;
        if ray.direction.y.abs() < 0.001 {
            return None;
        }
        let t = (plane_y - ray.origin.y) / ray.direction.y;
        if t > 0.0 {
            Some(ray.origin + ray.direction * t)
        } else {
            None
        }
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    orbit: Res<OrbitSettings>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    viewport_camera.is_orbiting = mouse_button.pressed(MouseButton::Right);
    viewport_camera.is_panning = mouse_button.pressed(MouseButton::Middle);

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    if viewport_camera.is_orbiting && mouse_delta != Vec2::ZERO {
        viewport_camera.theta -= mouse_delta.x * orbit.rotate_speed;
        viewport_camera.phi += mouse_delta.y * orbit.rotate_speed;
        // Keep the camera above the plane and off the zenith.
        viewport_camera.phi = viewport_camera.phi.clamp(0.1, std::f32::consts::PI / 2.0 - 0.05);
    } else if viewport_camera.is_panning && mouse_delta != Vec2::ZERO {
        let pan_x = -mouse_delta.x * orbit.pan_speed;
        let pan_z = mouse_delta.y * orbit.pan_speed;

        // Rotate the pan direction into the current view orientation.
        let cos_theta = (-viewport_camera.theta).cos();
        let sin_theta = (-viewport_camera.theta).sin();
        viewport_camera.target.x += pan_x * cos_theta - pan_z * sin_theta;
        viewport_camera.target.z += pan_x * sin_theta + pan_z * cos_theta;
    }

    // Wheel zoom with clamped radius (line and pixel scroll units).
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let zoom_factor = if scroll_accum < 0.0 {
            1.0 + orbit.zoom_speed
        } else {
            1.0 - orbit.zoom_speed
        };
        viewport_camera.radius = (viewport_camera.radius * zoom_factor)
            .clamp(orbit.min_radius, orbit.max_radius);
    }

    let target_pos = viewport_camera.position();
    let target_rot = Transform::from_translation(target_pos)
        .looking_at(viewport_camera.target, Vec3::Y)
        .rotation;

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn position_orbits_the_target() {
        let vp = ViewportCamera {
            target: Vec3::new(5.0, 0.0, -3.0),
            radius: 50.0,
            ..Default::default()
        };
        let pos = vp.position();
        assert_relative_eq!(pos.distance(vp.target), 50.0, epsilon = 1e-4);
        assert!(pos.y > vp.target.y);
    }

    #[test]
    fn plane_intersection_hits_below_camera() {
        let vp = ViewportCamera::default();
        let ray = Ray3d::new(Vec3::new(2.0, 10.0, 3.0), Dir3::NEG_Y);
        let hit = vp.flat_plane_intersection(&ray).unwrap();
        assert_relative_eq!(hit.x, 2.0);
        assert_relative_eq!(hit.y, 0.0);
        assert_relative_eq!(hit.z, 3.0);
    }

    #[test]
    fn plane_intersection_misses_grazing_and_upward_rays() {
        let vp = ViewportCamera::default();
        let level = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::X);
        assert!(vp.flat_plane_intersection(&level).is_none());

        let upward = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::Y);
        assert!(vp.flat_plane_intersection(&upward).is_none());
    }
}
