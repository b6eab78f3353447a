//! Day/night cycle, the sun turns a fixed amount every fixed tick.

use std::f32::consts::FRAC_PI_4;

use bevy::light::light_consts;
use bevy::prelude::*;

use crate::SetupSet;

pub fn plugin(app: &mut App) {
    app.register_type::<SunSettings>();
    app.init_resource::<SunSettings>();

    app.add_systems(Startup, spawn_sun.in_set(SetupSet::Spawn));
    app.add_systems(FixedUpdate, rotate_sun);
}

#[derive(Component, Debug, Default)]
#[require(Transform, Name::new("Sun"))]
pub struct Sun;

#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct SunSettings {
    /// Turn around the sun's local X per fixed tick.
    pub degrees_per_tick: f32,
}

impl Default for SunSettings {
    fn default() -> Self {
        Self { degrees_per_tick: 0.1 }
    }
}

pub fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        Sun,
        DirectionalLight {
            illuminance: light_consts::lux::AMBIENT_DAYLIGHT,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -FRAC_PI_4, FRAC_PI_4, 0.0)),
    ));
}

pub fn rotate_sun(settings: Res<SunSettings>, mut suns: Query<&mut Transform, With<Sun>>) {
    let angle = settings.degrees_per_tick.to_radians();
    for mut transform in &mut suns {
        transform.rotate_local_x(angle);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    #[test]
    fn turns_each_tick() {
        let mut world = World::new();
        world.insert_resource(SunSettings { degrees_per_tick: 45.0 });
        let sun = world.spawn(Sun).id();
        let bystander = world.spawn(Transform::IDENTITY).id();

        for _ in 0..2 {
            world.run_system_once(rotate_sun).unwrap();
        }

        // Two ticks of 45 degrees turn local -Z straight up.
        let forward = world.get::<Transform>(sun).unwrap().forward();
        assert_relative_eq!(forward.y, 1.0, epsilon = 1e-5);
        assert_eq!(*world.get::<Transform>(bystander).unwrap(), Transform::IDENTITY);
    }

    #[test]
    fn slow_by_default() {
        let mut world = World::new();
        world.init_resource::<SunSettings>();
        let sun = world.spawn(Sun).id();

        for _ in 0..900 {
            world.run_system_once(rotate_sun).unwrap();
        }

        // 900 ticks at 0.1 degrees is a quarter turn.
        let (axis, angle) = world.get::<Transform>(sun).unwrap().rotation.to_axis_angle();
        assert_relative_eq!(angle, std::f32::consts::FRAC_PI_2, epsilon = 1e-3);
        assert_relative_eq!(axis.x.abs(), 1.0, epsilon = 1e-3);
    }
}
