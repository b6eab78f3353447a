use bevy::camera::ScalingMode;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;

use crate::SetupSet;
use crate::area::RegionCamera;
use crate::mode::{GameMode, ModeCamera};

/// Height the region camera looks down from. Framing keeps it.
pub const REGION_CAMERA_HEIGHT: f32 = 40.0;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_cameras.in_set(SetupSet::Spawn));
}

pub fn camera_components() -> impl Bundle {
    (
        Camera3d::default(),
        Tonemapping::default(),
        // Exposure::SUNLIGHT,
        Msaa::Sample4,
    )
}

/// Top down orthographic camera over the fence anchor.
pub fn region_camera_components() -> impl Bundle {
    (
        camera_components(),
        Camera { is_active: false, ..default() },
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical { viewport_height: 10.0 },
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_xyz(0.0, REGION_CAMERA_HEIGHT, 0.0).looking_at(Vec3::ZERO, Vec3::NEG_Z),
        RegionCamera,
        ModeCamera(GameMode::RegionSelect),
        Name::new("Region Camera"),
    )
}

pub fn main_camera_components() -> impl Bundle {
    (
        camera_components(),
        Camera { is_active: false, ..default() },
        Projection::Perspective(PerspectiveProjection::default()),
        Transform::from_xyz(-14.0, 9.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
        ModeCamera(GameMode::Main),
        Name::new("Main Camera"),
    )
}

/// Cameras start inactive, switching modes turns one of them on.
pub fn spawn_cameras(mut commands: Commands) {
    commands.spawn(region_camera_components());
    commands.spawn(main_camera_components());
}
