/// Pixel resolution of the static satellite imagery tiles
pub const IMAGERY_TEXTURE_SIZE: usize = 1024;

/// Side length of the drawable ground plane in plane units (metres)
pub const GROUND_PLANE_SIZE: f32 = 100.0;

/// Imagery zoom level requested from the tile provider
pub const DEFAULT_ZOOM: f32 = 19.5;

/// Fallback site centre used when no geolocation is supplied
pub const DEFAULT_LONGITUDE: f64 = -122.4442;
pub const DEFAULT_LATITUDE: f64 = 37.7354;
