pub use bevy;
use bevy::prelude::*;

pub mod area;
pub mod camera;
pub mod mode;
pub mod sun;
pub mod ui;

/// Startup ordering: scene entities first, then the resources that point at
/// them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupSet {
    Spawn,
    Link,
}

pub fn configure_sets(app: &mut App) {
    app.configure_sets(Startup, (SetupSet::Spawn, SetupSet::Link).chain());
}

/// Fence generation and the sun, nothing that needs a window.
pub fn shared(app: &mut App) {
    configure_sets(app);
    app.add_plugins(area::plugin).add_plugins(sun::plugin);
}

/// Cameras, mode switching and the panels.
pub fn client(app: &mut App) {
    configure_sets(app);
    app.add_plugins(camera::plugin).add_plugins(mode::plugin).add_plugins(ui::plugin);
    app.insert_resource(ClearColor(Color::srgb(0.53, 0.72, 0.86)));
    app.add_systems(Startup, spawn_ground.in_set(SetupSet::Spawn));
}

pub fn spawn_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(200.0, 200.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.55, 0.3),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.3, 0.0),
    ));
}
