//! Switching between region selection and the main mode.
//!
//! Each mode owns one camera and one panel. Exactly one pair is active at a
//! time, the player is only shown in the main mode.

use bevy::prelude::*;
use bevy_egui::input::EguiWantsInput;
use thiserror::Error;

use crate::SetupSet;

pub const MODE_COUNT: usize = 2;

pub fn plugin(app: &mut App) {
    app.register_type::<GameMode>().register_type::<ModeCamera>().register_type::<ModePanel>();
    app.add_message::<SelectMode>();

    app.add_systems(Startup, spawn_player.in_set(SetupSet::Spawn));
    app.add_systems(Startup, build_mode_rig.in_set(SetupSet::Link));
    app.add_systems(PostStartup, request_initial_mode);
    app.add_systems(Update, (mode_shortcuts, switch_mode).chain());
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum GameMode {
    #[default]
    RegionSelect,
    Main,
}

impl GameMode {
    pub const ALL: [GameMode; MODE_COUNT] = [GameMode::RegionSelect, GameMode::Main];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, ModeError> {
        Self::ALL.get(index).copied().ok_or(ModeError::OutOfRange { index, count: MODE_COUNT })
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % MODE_COUNT]
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::RegionSelect => "Region",
            GameMode::Main => "Main",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("unacceptable mode index {index}, there are {count} modes")]
    OutOfRange { index: usize, count: usize },
    #[error("no {0} for mode {1:?}")]
    Missing(&'static str, GameMode),
    #[error("{0} is set up more than once for mode {1:?}")]
    Duplicate(&'static str, GameMode),
}

/// Turn on `active[index]` and every other slot off.
///
/// Out of range indices leave `active` untouched.
pub fn select_active(active: &mut [bool], index: usize) -> Result<(), ModeError> {
    if index >= active.len() {
        return Err(ModeError::OutOfRange { index, count: active.len() });
    }

    for (slot, flag) in active.iter_mut().enumerate() {
        *flag = slot == index;
    }

    Ok(())
}

/// Switch to the mode at this index. The index is checked when handled.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectMode(pub usize);

impl From<GameMode> for SelectMode {
    fn from(mode: GameMode) -> Self {
        SelectMode(mode.index())
    }
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ModeCamera(pub GameMode);

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ModePanel(pub GameMode);

#[derive(Component, Debug, Default)]
#[require(Transform, Visibility = Visibility::Hidden, Name::new("Player"))]
pub struct Player;

/// Camera and panel of every mode, indexed by [`GameMode::index`].
#[derive(Resource, Debug, Clone)]
pub struct ModeRig {
    pub cameras: [Entity; MODE_COUNT],
    pub panels: [Entity; MODE_COUNT],
    pub player: Option<Entity>,
    pub active: GameMode,
}

impl ModeRig {
    /// Gather tagged cameras and panels into one slot per mode.
    pub fn collect(
        cameras: impl IntoIterator<Item = (Entity, GameMode)>,
        panels: impl IntoIterator<Item = (Entity, GameMode)>,
        player: Option<Entity>,
    ) -> Result<Self, ModeError> {
        Ok(Self {
            cameras: slots("camera", cameras)?,
            panels: slots("panel", panels)?,
            player,
            active: GameMode::default(),
        })
    }

    pub fn is_active(&self, mode: GameMode) -> bool {
        self.active == mode
    }
}

fn slots(
    what: &'static str,
    tagged: impl IntoIterator<Item = (Entity, GameMode)>,
) -> Result<[Entity; MODE_COUNT], ModeError> {
    let mut slots = [None; MODE_COUNT];
    for (entity, mode) in tagged {
        let slot = &mut slots[mode.index()];
        if slot.is_some() {
            return Err(ModeError::Duplicate(what, mode));
        }
        *slot = Some(entity);
    }

    let mut entities = [Entity::PLACEHOLDER; MODE_COUNT];
    for (mode, (entity, slot)) in GameMode::ALL.into_iter().zip(entities.iter_mut().zip(slots)) {
        *entity = slot.ok_or(ModeError::Missing(what, mode))?;
    }
    Ok(entities)
}

pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Player,
        Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.45, 0.8),
            ..default()
        })),
        Transform::from_xyz(0.0, 0.8, 0.0),
    ));
}

pub fn build_mode_rig(
    mut commands: Commands,
    cameras: Query<(Entity, &ModeCamera)>,
    panels: Query<(Entity, &ModePanel)>,
    player: Query<Entity, With<Player>>,
) {
    let rig = ModeRig::collect(
        cameras.iter().map(|(entity, camera)| (entity, camera.0)),
        panels.iter().map(|(entity, panel)| (entity, panel.0)),
        player.iter().next(),
    );

    match rig {
        Ok(rig) => commands.insert_resource(rig),
        Err(err) => error!("mode switching is not set up: {err}"),
    }
}

pub fn request_initial_mode(mut writer: MessageWriter<SelectMode>) {
    writer.write(GameMode::RegionSelect.into());
}

pub fn mode_shortcuts(
    input: Res<ButtonInput<KeyCode>>,
    rig: Option<Res<ModeRig>>,
    egui_wants: Option<Res<EguiWantsInput>>,
    mut writer: MessageWriter<SelectMode>,
) {
    // Typing into a text field should not switch modes.
    if egui_wants.is_some_and(|wants| wants.wants_any_keyboard_input()) {
        return;
    }

    if input.just_pressed(KeyCode::Digit1) {
        writer.write(GameMode::RegionSelect.into());
    } else if input.just_pressed(KeyCode::Digit2) {
        writer.write(GameMode::Main.into());
    } else if input.just_pressed(KeyCode::Tab) {
        let active = rig.map(|rig| rig.active).unwrap_or_default();
        writer.write(active.next().into());
    }
}

pub fn switch_mode(
    mut requests: MessageReader<SelectMode>,
    rig: Option<ResMut<ModeRig>>,
    mut cameras: Query<&mut Camera>,
    mut visibilities: Query<&mut Visibility>,
) {
    let Some(mut rig) = rig else {
        for request in requests.read() {
            warn!("ignoring {request:?}, mode switching is not set up");
        }
        return;
    };

    for &SelectMode(index) in requests.read() {
        let mode = match GameMode::from_index(index) {
            Ok(mode) => mode,
            Err(err) => {
                error!("{err}");
                continue;
            },
        };
        let mut active = [false; MODE_COUNT];
        if let Err(err) = select_active(&mut active, mode.index()) {
            error!("{err}");
            continue;
        }

        if let Some(player) = rig.player {
            if let Ok(mut visibility) = visibilities.get_mut(player) {
                *visibility = match mode {
                    GameMode::RegionSelect => Visibility::Hidden,
                    GameMode::Main => Visibility::Inherited,
                };
            }
        }

        for (&camera, on) in rig.cameras.iter().zip(active) {
            if let Ok(mut camera) = cameras.get_mut(camera) {
                camera.is_active = on;
            }
        }
        for (&panel, on) in rig.panels.iter().zip(active) {
            if let Ok(mut visibility) = visibilities.get_mut(panel) {
                *visibility = if on { Visibility::Inherited } else { Visibility::Hidden };
            }
        }

        rig.active = mode;
        info!("switched to {mode:?} mode");
    }
}
