use bevy::prelude::*;
use paddock::{ClientPlugin, SharedPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window { title: "Paddock".into(), ..default() }),
            ..default()
        }))
        .add_plugins(ClientPlugin)
        .add_plugins(SharedPlugin)
        .run();
}
