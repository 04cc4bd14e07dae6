use bevy::prelude::*;

use crate::engine::assets::imagery::{ImageryState, SiteAssets};
use crate::engine::assets::site_manifest::SiteManifest;

#[derive(Component)]
pub struct GroundPlane;

#[derive(Resource, Default)]
pub struct GroundCreated {
    pub created: bool,
}

/// Spawn the drawable ground plane once the site manifest is available.
///
/// The plane comes up with the fallback material immediately; the imagery
/// texture is applied later if and when its fetch succeeds, so a slow or
/// failed download never blocks drawing.
pub fn create_ground_when_ready(
    mut commands: Commands,
    mut ground_created: ResMut<GroundCreated>,
    manifest: Option<Res<SiteManifest>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if ground_created.created {
        return;
    }
    let Some(manifest) = manifest else {
        return;
    };

    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(manifest.plane_size, manifest.plane_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.56, 0.93, 0.56),
            perceptual_roughness: 1.0,
            ..default()
        })),
        // Rectangle meshes face +Z; lay it flat on the ground.
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        GroundPlane,
    ));

    ground_created.created = true;
    println!("✓ Ground plane created ({} x {})", manifest.plane_size, manifest.plane_size);
}

/// Swap the satellite imagery onto the ground plane once it is loaded.
pub fn apply_ground_imagery(
    site: Res<SiteAssets>,
    ground: Query<&MeshMaterial3d<StandardMaterial>, With<GroundPlane>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if site.imagery_state != ImageryState::Loaded || !site.is_changed() {
        return;
    }
    let Ok(material_handle) = ground.single() else {
        return;
    };
    if let Some(material) = materials.get_mut(&material_handle.0) {
        material.base_color = Color::WHITE;
        material.base_color_texture = site.imagery.clone();
    }
}
