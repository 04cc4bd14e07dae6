use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::imagery::{
    SiteAssets, SiteLocationEvent, handle_site_location_events, poll_site_imagery,
    poll_site_manifest, start_site_loading,
};
use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::{
    AppState, DrawStatusText, FpsText, status_text_update_system, transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::ground::{GroundCreated, apply_ground_imagery, create_ground_when_ready};
use crate::engine::scene::lighting::spawn_lighting;

// Crate tools modules
use crate::tools::{
    footprint::FootprintToolPlugin,
    footprint::input::footprint_input_system,
    footprint::render::{update_footprint_preview, update_footprint_render},
    massing::MassingToolPlugin,
    massing::promote::{
        handle_footprint_closed, handle_promotion_actions, handle_shape_pick_events,
    },
    tool_manager::{
        DrawStatus, MassingActionEvent, MassingSettings, broadcast_draw_status,
        handle_massing_action_events, handle_massing_keyboard_shortcuts,
    },
};

// Web RPC modules
use crate::rpc::web_rpc::{WebRpcInterface, WebRpcPlugin};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SiteManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SiteManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(FootprintToolPlugin)
        .add_plugins(MassingToolPlugin);

    // Initialise resources early
    app.init_resource::<SiteAssets>()
        .init_resource::<GroundCreated>()
        .init_resource::<MassingSettings>()
        .insert_resource(DrawStatus {
            message: "Loading site imagery...".to_string(),
        })
        .insert_resource(ViewportCamera::default())
        .insert_resource(constants::render_settings::ORBIT_SETTINGS)
        .add_event::<MassingActionEvent>()
        .add_event::<SiteLocationEvent>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_site_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                poll_site_manifest,
                create_ground_when_ready,
                transition_to_running,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            // Imagery keeps resolving after the scene is interactive; a slow
            // fetch only delays the texture swap, never the drawing.
            (poll_site_imagery, apply_ground_imagery, handle_site_location_events),
        );

    // Base runtime systems that run on all platforms.
    let runtime_systems = (
        camera_controller,
        // Action routing: mode/height first so an RPC set_height lands
        // before an extrude from the same frame.
        handle_massing_keyboard_shortcuts,
        (handle_massing_action_events, handle_promotion_actions).chain(),
        // Drawing input and shape promotion
        footprint_input_system,
        handle_footprint_closed,
        handle_shape_pick_events,
        // Visual rebuilds from state
        update_footprint_render,
        update_footprint_preview,
        // Status surfaces
        broadcast_draw_status,
        status_text_update_system,
    );

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    // FPS diagnostics: overlay text natively, notification stream for the web.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }
    app.add_systems(Update, fps_notification_system);

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    create_viewport_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

fn create_viewport_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 104.0, 60.0).looking_at(Vec3::ZERO, Vec3::Y),
        RenderLayers::default().with(1),
    ));
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading site imagery..."),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 1., 1.)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                DrawStatusText,
            ));

            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

#[cfg(not(target_arch = "wasm32"))]
fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}

fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    // Send FPS every 0.5 seconds
    if current_time - *last_send_time >= 0.5 {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                rpc_interface.send_notification(
                    "fps_update",
                    serde_json::json!({
                        "fps": value as f32
                    }),
                );
                *last_send_time = current_time;
            }
        }
    }
}
