/// Orbit camera resource, controller system, and ground-plane projection.
pub mod viewport_camera;
