use bevy::prelude::*;
use constants::imagery::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_ZOOM, GROUND_PLANE_SIZE};
use serde::{Deserialize, Serialize};

/// Site description as a Bevy asset. Mirrors the JSON structure exactly.
///
/// Loaded from `assets/site/manifest.json`; the deployment step writes the
/// manifest and drops the matching imagery tile next to it.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct SiteManifest {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f32,
    /// Side length of the drawable plane in plane units (metres).
    pub plane_size: f32,
    /// Imagery file name relative to the `site/` asset directory.
    pub imagery_file: String,
    /// Reverse-geocoded display address, when the provider resolved one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Default for SiteManifest {
    fn default() -> Self {
        Self {
            longitude: DEFAULT_LONGITUDE,
            latitude: DEFAULT_LATITUDE,
            zoom: DEFAULT_ZOOM,
            plane_size: GROUND_PLANE_SIZE,
            imagery_file: "satellite.png".to_string(),
            address: None,
        }
    }
}

impl SiteManifest {
    /// Asset path of the satellite imagery texture.
    pub fn imagery_path(&self) -> String {
        format!("site/{}", self.imagery_file)
    }
}
