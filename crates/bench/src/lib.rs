use paddock_core::area::{
    AreaInput, AreaRig, AreaSettings, ApplyArea, FenceAnchor, FenceSegment, SegmentPrefab,
    SpawnedSegments, apply_area,
};
use paddock_core::bevy;

use bevy::prelude::*;

/// Criterion bench setup
#[derive(Copy, Clone, Debug)]
pub struct MeasurementSetup {
    pub measurement_time: std::time::Duration,
    pub sample_size: usize,
}

impl Default for MeasurementSetup {
    fn default() -> Self {
        Self { measurement_time: std::time::Duration::from_secs(10), sample_size: 100 }
    }
}

/// A region size to lay out, in grid cells.
#[derive(Clone, Debug)]
pub struct LayoutBench {
    pub name: &'static str,
    pub width: u32,
    pub depth: u32,
    /// How many times the fence is regenerated per iteration.
    pub regenerations: usize,
    pub measurement: MeasurementSetup,
}

pub fn basic_benches() -> Vec<LayoutBench> {
    vec![
        LayoutBench {
            name: "small 4x3",
            width: 4,
            depth: 3,
            regenerations: 10,
            measurement: MeasurementSetup::default(),
        },
        LayoutBench {
            name: "medium 64x48",
            width: 64,
            depth: 48,
            regenerations: 10,
            measurement: MeasurementSetup::default(),
        },
        LayoutBench {
            name: "large 1000x1000",
            width: 1000,
            depth: 1000,
            regenerations: 2,
            measurement: MeasurementSetup { sample_size: 20, ..default() },
        },
    ]
}

impl LayoutBench {
    pub fn input(&self) -> AreaInput {
        AreaInput::new(self.width.to_string(), self.depth.to_string())
    }
}

/// Headless app that only regenerates the fence, no window or rendering.
pub fn plugin_setup(input: AreaInput) -> App {
    let mut app = App::new();
    app.init_resource::<AreaSettings>();
    app.insert_resource(input);
    app.add_message::<ApplyArea>();
    app.add_systems(Update, apply_area);

    let world = app.world_mut();
    let anchor = world.spawn((FenceAnchor, SpawnedSegments::default())).id();
    world.insert_resource(AreaRig { anchor, camera: None });
    world.insert_resource(SegmentPrefab { mesh: Handle::default(), material: Handle::default() });

    app
}

pub fn regenerate(app: &mut App) {
    app.world_mut().write_message(ApplyArea);
    app.update();
}

pub fn segment_count(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query_filtered::<(), With<FenceSegment>>();
    query.iter(world).count()
}
