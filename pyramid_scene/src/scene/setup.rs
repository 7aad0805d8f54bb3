//! Camera, lights and background for the pyramid scene.

use bevy::core_pipeline::bloom::Bloom;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::camera::{reframe_on_resize, CameraRig};
use crate::render::CloudsMaterial;

const KEY_LIGHT_COLOR: Color = Color::srgb(0.4, 0.8, 1.0);
const FILL_LIGHT_COLOR: Color = Color::srgb(0.2, 0.333, 0.467);
const BACKDROP_SIZE: Vec2 = Vec2::new(100.0, 50.0);
const BACKDROP_POSITION: Vec3 = Vec3::new(0.0, 6.0, -80.0);
const BACKDROP_TILT_DEGREES: f32 = 65.0;

/// The perspective camera all picking rays start from.
#[derive(Component)]
pub struct SceneCamera;

/// Backdrop plane driven by [`CloudsMaterial`].
#[derive(Component)]
pub struct CloudLayer;

/// What sits behind the pyramid.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    Clouds,
    /// Static image, given as an asset path.
    Texture(String),
    None,
}

pub fn scene_plugin(app: &mut App) {
    app.init_resource::<Background>()
        .add_systems(Startup, setup_scene)
        .add_systems(Update, (reframe_on_resize, animate_clouds));
}

pub fn setup_scene(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    background: Res<Background>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut cloud_materials: ResMut<Assets<CloudsMaterial>>,
) {
    let (width, height) = windows
        .get_single()
        .map(|window| (window.width(), window.height()))
        .unwrap_or((1280.0, 720.0));
    let rig = CameraRig::new(width, height);
    info!("initial framing {:?} for {width}x{height}", rig.framing.class);

    commands.spawn((
        SceneCamera,
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: rig.framing.fov_degrees.to_radians(),
            ..default()
        }),
        Bloom {
            intensity: 0.3,
            ..Bloom::NATURAL
        },
        rig.transform(),
        rig,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });
    commands.spawn((
        DirectionalLight {
            color: KEY_LIGHT_COLOR,
            illuminance: 2_500.0,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            color: FILL_LIGHT_COLOR,
            illuminance: 1_000.0,
            ..default()
        },
        Transform::from_xyz(-5.0, -2.0, -5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let backdrop = Transform::from_translation(BACKDROP_POSITION)
        .with_rotation(Quat::from_rotation_x(BACKDROP_TILT_DEGREES.to_radians()));
    match background.as_ref() {
        Background::Clouds => {
            commands.spawn((
                CloudLayer,
                Mesh3d(meshes.add(Rectangle::from_size(BACKDROP_SIZE))),
                MeshMaterial3d(cloud_materials.add(CloudsMaterial::default())),
                backdrop,
            ));
        }
        Background::Texture(path) => {
            commands.spawn((
                Mesh3d(meshes.add(Rectangle::from_size(BACKDROP_SIZE))),
                MeshMaterial3d(standard_materials.add(StandardMaterial {
                    base_color_texture: Some(asset_server.load(path.clone())),
                    unlit: true,
                    ..default()
                })),
                backdrop,
            ));
        }
        Background::None => {}
    }
}

fn animate_clouds(
    time: Res<Time>,
    layers: Query<&MeshMaterial3d<CloudsMaterial>, With<CloudLayer>>,
    mut materials: ResMut<Assets<CloudsMaterial>>,
) {
    for handle in &layers {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.params.x = time.elapsed_secs();
        }
    }
}
