use bevy::prelude::*;
use constants::imagery::IMAGERY_TEXTURE_SIZE;

use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::tool_manager::DrawStatus;

use super::site_manifest::SiteManifest;

/// Lifecycle of the asynchronous imagery fetch.
///
/// `Failed` is not fatal: the ground plane keeps its fallback material and
/// drawing stays fully usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageryState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// Handles and load progress for the site manifest and imagery texture.
#[derive(Resource, Default)]
pub struct SiteAssets {
    pub manifest: Option<Handle<SiteManifest>>,
    pub imagery: Option<Handle<Image>>,
    pub imagery_state: ImageryState,
    pub manifest_loaded: bool,
}

/// Event fired when the frontend supplies a new site location.
#[derive(Event)]
pub struct SiteLocationEvent {
    pub longitude: f64,
    pub latitude: f64,
    pub address: Option<String>,
}

/// Start loading the site manifest.
pub fn start_site_loading(mut site: ResMut<SiteAssets>, asset_server: Res<AssetServer>) {
    site.manifest = Some(asset_server.load("site/manifest.json"));
}

/// Poll the manifest load and kick off the imagery fetch when it lands.
///
/// A missing or unparseable manifest degrades to the built-in default site
/// so the scene still comes up; last write wins, nothing is retried.
pub fn poll_site_manifest(
    mut commands: Commands,
    mut site: ResMut<SiteAssets>,
    manifests: Res<Assets<SiteManifest>>,
    asset_server: Res<AssetServer>,
) {
    if site.manifest_loaded {
        return;
    }
    let Some(handle) = site.manifest.clone() else {
        return;
    };

    if let Some(manifest) = manifests.get(&handle) {
        println!("✓ Site manifest loaded ({}, {})", manifest.longitude, manifest.latitude);
        site.manifest_loaded = true;
        site.imagery = Some(asset_server.load(&manifest.imagery_path()));
        commands.insert_resource(
            crate::engine::camera::viewport_camera::ViewportCamera::with_plane_size(
                manifest.plane_size,
            ),
        );
        commands.insert_resource(manifest.clone());
    } else if matches!(
        asset_server.get_load_state(&handle),
        Some(bevy::asset::LoadState::Failed(_))
    ) {
        warn!("Site manifest failed to load, using default site");
        let manifest = SiteManifest::default();
        site.manifest_loaded = true;
        site.imagery = Some(asset_server.load(&manifest.imagery_path()));
        commands.insert_resource(manifest);
    }
}

/// Poll the imagery texture load and surface the outcome.
pub fn poll_site_imagery(
    mut site: ResMut<SiteAssets>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut status: ResMut<DrawStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if site.imagery_state != ImageryState::Pending {
        return;
    }
    let Some(handle) = site.imagery.clone() else {
        return;
    };

    match asset_server.get_load_state(&handle) {
        Some(bevy::asset::LoadState::Loaded) => {
            site.imagery_state = ImageryState::Loaded;
            if let Some(image) = images.get(&handle) {
                if image.width() as usize != IMAGERY_TEXTURE_SIZE {
                    warn!(
                        "Imagery tile is {}px, expected {}px",
                        image.width(),
                        IMAGERY_TEXTURE_SIZE
                    );
                }
            }
            status.set("Map loaded - toggle drawing to begin");
            rpc_interface.send_notification("site_imagery_loaded", serde_json::json!({}));
        }
        Some(bevy::asset::LoadState::Failed(_)) => {
            site.imagery_state = ImageryState::Failed;
            warn!("Satellite imagery failed to load, keeping fallback plane");
            status.set("Fallback mode - toggle drawing to begin");
            rpc_interface.send_notification("site_imagery_failed", serde_json::json!({}));
        }
        _ => {}
    }
}

/// Apply a frontend-supplied location: update the site record, re-request
/// the imagery tile, and re-broadcast the resolved address.
pub fn handle_site_location_events(
    mut events: EventReader<SiteLocationEvent>,
    mut site: ResMut<SiteAssets>,
    manifest: Option<ResMut<SiteManifest>>,
    asset_server: Res<AssetServer>,
    mut status: ResMut<DrawStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(mut manifest) = manifest else {
        return;
    };

    for event in events.read() {
        manifest.longitude = event.longitude;
        manifest.latitude = event.latitude;
        manifest.address = event.address.clone();

        // The deployment refreshes the tile under the same path; reload it
        // and fall back gracefully if nothing new appears.
        site.imagery = Some(asset_server.load(&manifest.imagery_path()));
        site.imagery_state = ImageryState::Pending;
        asset_server.reload(manifest.imagery_path());

        info!(
            "Site location updated to ({}, {})",
            event.longitude, event.latitude
        );
        if let Some(address) = &event.address {
            status.set(format!("Site: {address}"));
            rpc_interface.send_notification(
                "address_resolved",
                serde_json::json!({ "address": address }),
            );
        }
        rpc_interface.send_notification(
            "location_changed",
            serde_json::json!({
                "longitude": event.longitude,
                "latitude": event.latitude,
            }),
        );
    }
}
