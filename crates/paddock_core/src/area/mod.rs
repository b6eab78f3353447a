//! Region selection: a rectangular fence sized from the region panel and an
//! orthographic camera framed around it.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use thiserror::Error;

use crate::SetupSet;

pub mod framing;
pub mod input;
pub mod layout;

pub use framing::{CameraFrame, FRAME_MARGIN, FramingError, frame_camera, viewport_aspect};
pub use input::{AreaInput, Field, InputError, validate_input};
pub use layout::{
    Dimensions, GridCells, MULTIPLIER, PerimeterLayout, SegmentPlacement, Side, Yaw, generate_layout,
};

pub fn plugin(app: &mut App) {
    app.register_type::<AreaSettings>()
        .register_type::<AreaInput>()
        .register_type::<FenceAnchor>()
        .register_type::<FenceSegment>();

    app.init_resource::<AreaSettings>();
    app.init_resource::<AreaInput>();
    app.add_message::<ApplyArea>();

    app.add_systems(Startup, (setup_segment_prefab, spawn_anchor).in_set(SetupSet::Spawn));
    app.add_systems(Startup, link_region_camera.in_set(SetupSet::Link));
    app.add_systems(PostStartup, (validate_references, request_initial_area).chain());
    app.add_systems(Update, apply_area.run_if(on_message::<ApplyArea>));
}

/// Tunables for the region fence.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct AreaSettings {
    /// Segments per grid cell.
    pub multiplier: u32,
    /// View extent relative to the perimeter when framing the camera.
    pub frame_margin: f32,
    /// Upper bound for either entered dimension, in grid cells.
    pub max_cells: u32,
    /// Size of one fence segment mesh, its length runs along X.
    pub segment_size: Vec3,
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            multiplier: MULTIPLIER,
            frame_margin: FRAME_MARGIN,
            max_cells: 1000,
            segment_size: Vec3::new(1.0, 0.6, 0.1),
        }
    }
}

/// Regenerate the fence from the current [`AreaInput`].
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ApplyArea;

/// Parent of every fence segment and the horizontal center of the region
/// camera.
#[derive(Component, Debug, Default, Reflect)]
#[require(Transform, Visibility, Name::new("Fence Anchor"))]
#[reflect(Component)]
pub struct FenceAnchor;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[require(Transform, Visibility)]
#[reflect(Component)]
pub struct FenceSegment {
    pub side: Side,
    pub index: u32,
}

/// Segments currently spawned under an anchor.
#[derive(Component, Debug, Default)]
pub struct SpawnedSegments(pub Vec<Entity>);

/// Camera that gets framed around the fence.
#[derive(Component, Debug, Default)]
pub struct RegionCamera;

/// Shared mesh and material for every segment.
#[derive(Resource, Debug, Clone)]
pub struct SegmentPrefab {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Scene references the fence needs.
#[derive(Resource, Debug, Clone, Copy)]
pub struct AreaRig {
    pub anchor: Entity,
    pub camera: Option<Entity>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("region input fields are not set up")]
    MissingInput,
    #[error("no fence segment prefab")]
    MissingPrefab,
    #[error("no fence anchor")]
    MissingAnchor,
    #[error("no region camera")]
    MissingCamera,
}

pub fn setup_segment_prefab(
    mut commands: Commands,
    settings: Res<AreaSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = settings.segment_size;
    commands.insert_resource(SegmentPrefab {
        mesh: meshes.add(Cuboid::new(size.x, size.y, size.z)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(205. / 255., 157. / 255., 111. / 255.),
            perceptual_roughness: 1.0,
            ..default()
        }),
    });
}

pub fn spawn_anchor(mut commands: Commands, rig: Option<Res<AreaRig>>) {
    if rig.is_some() {
        return;
    }

    let anchor = commands.spawn((FenceAnchor, SpawnedSegments::default())).id();
    commands.insert_resource(AreaRig { anchor, camera: None });
}

pub fn link_region_camera(
    rig: Option<ResMut<AreaRig>>,
    cameras: Query<Entity, With<RegionCamera>>,
) {
    let Some(mut rig) = rig else { return };
    if rig.camera.is_some() {
        return;
    }

    match cameras.single() {
        Ok(camera) => rig.camera = Some(camera),
        Err(err) => warn!("cannot pick a region camera: {err}"),
    }
}

/// Log every missing reference. The game keeps running without a fence.
pub fn validate_references(
    input: Option<Res<AreaInput>>,
    prefab: Option<Res<SegmentPrefab>>,
    rig: Option<Res<AreaRig>>,
    anchors: Query<(), With<FenceAnchor>>,
    cameras: Query<(), With<RegionCamera>>,
) {
    for err in missing_references(input.is_some(), prefab.is_some(), rig.as_deref(), &anchors, &cameras) {
        error!("region select is not set up: {err}");
    }
}

fn missing_references(
    has_input: bool,
    has_prefab: bool,
    rig: Option<&AreaRig>,
    anchors: &Query<(), With<FenceAnchor>>,
    cameras: &Query<(), With<RegionCamera>>,
) -> Vec<ReferenceError> {
    let mut errs = Vec::new();

    if !has_input {
        errs.push(ReferenceError::MissingInput);
    }
    if !has_prefab {
        errs.push(ReferenceError::MissingPrefab);
    }

    match rig {
        Some(rig) => {
            if !anchors.contains(rig.anchor) {
                errs.push(ReferenceError::MissingAnchor);
            }
            if !rig.camera.is_some_and(|camera| cameras.contains(camera)) {
                errs.push(ReferenceError::MissingCamera);
            }
        },
        None => {
            errs.push(ReferenceError::MissingAnchor);
            errs.push(ReferenceError::MissingCamera);
        },
    }

    errs
}

pub fn request_initial_area(mut writer: MessageWriter<ApplyArea>) {
    writer.write(ApplyArea);
}

#[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
pub fn apply_area(
    mut commands: Commands,
    mut requests: MessageReader<ApplyArea>,
    settings: Res<AreaSettings>,
    input: Option<ResMut<AreaInput>>,
    prefab: Option<Res<SegmentPrefab>>,
    rig: Option<Res<AreaRig>>,
    mut anchors: Query<(&GlobalTransform, &mut SpawnedSegments), With<FenceAnchor>>,
    mut cameras: Query<(&mut Projection, &mut Transform), With<RegionCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    // Several requests in one frame collapse into one regeneration.
    if requests.read().count() == 0 {
        return;
    }

    let (Some(mut input), Some(prefab), Some(rig)) = (input, prefab, rig) else {
        warn!("skipping region update, scene references are missing");
        return;
    };

    let Ok((anchor_transform, mut spawned)) = anchors.get_mut(rig.anchor) else {
        warn!("skipping region update, fence anchor {:?} is gone", rig.anchor);
        return;
    };

    let cells = match validate_input(&mut input, &settings) {
        Ok(cells) => cells,
        Err(err) => {
            error!("invalid region size: {err}");
            return;
        },
    };

    let dimensions = Dimensions::from_cells(cells, settings.multiplier);
    let layout = PerimeterLayout::generate(dimensions);

    for segment in spawned.0.drain(..) {
        commands.entity(segment).try_despawn();
    }

    spawned.0.extend(layout.segments.iter().map(|placement| {
        commands
            .spawn((
                FenceSegment { side: placement.side, index: placement.index },
                placement.local_transform(),
                Mesh3d(prefab.mesh.clone()),
                MeshMaterial3d(prefab.material.clone()),
                ChildOf(rig.anchor),
                Name::new("Fence Segment"),
            ))
            .id()
    }));

    info!(
        "spawned {} fence segments for a {}x{} region ({}x{} cells)",
        layout.len(),
        dimensions.width,
        dimensions.depth,
        cells.width,
        cells.depth
    );

    let Some(camera) = rig.camera else {
        warn!("no region camera to frame");
        return;
    };
    let Ok((mut projection, mut camera_transform)) = cameras.get_mut(camera) else {
        warn!("region camera {camera:?} is missing");
        return;
    };

    let aspect = windows.single().ok().and_then(viewport_aspect).unwrap_or(1.0);
    let framed = frame_region(
        &mut projection,
        &mut camera_transform,
        dimensions,
        aspect,
        anchor_transform.translation(),
        settings.frame_margin,
    );

    if let Err(err) = framed {
        warn!("could not frame region camera: {err}");
    }
}

/// Fit the camera around a perimeter centered on `anchor`, keeping its height.
pub fn frame_region(
    projection: &mut Projection,
    transform: &mut Transform,
    dimensions: Dimensions,
    aspect: f32,
    anchor: Vec3,
    margin: f32,
) -> Result<(), FramingError> {
    let frame = CameraFrame::fit(dimensions, aspect, anchor, transform.translation.y, margin)?;
    frame_camera(projection, transform, &frame)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn setup(input: AreaInput, projection: Projection) -> App {
        let mut app = App::new();
        app.init_resource::<AreaSettings>();
        app.insert_resource(input);
        app.add_message::<ApplyArea>();
        app.add_systems(Update, apply_area.run_if(on_message::<ApplyArea>));

        let world = app.world_mut();
        world.spawn((Window::default(), PrimaryWindow));
        let camera = world
            .spawn((RegionCamera, projection, Transform::from_xyz(0.0, 40.0, 0.0)))
            .id();
        let anchor = world
            .spawn((
                FenceAnchor,
                SpawnedSegments::default(),
                GlobalTransform::from_translation(Vec3::new(5.0, 0.0, -2.0)),
            ))
            .id();
        world.insert_resource(AreaRig { anchor, camera: Some(camera) });
        world.insert_resource(SegmentPrefab { mesh: Handle::default(), material: Handle::default() });

        app
    }

    fn apply(app: &mut App) {
        app.world_mut().write_message(ApplyArea);
        app.update();
    }

    fn segments(app: &mut App) -> HashSet<Entity> {
        let world = app.world_mut();
        let mut query = world.query_filtered::<Entity, With<FenceSegment>>();
        query.iter(world).collect()
    }

    fn orthographic() -> Projection {
        Projection::Orthographic(OrthographicProjection::default_3d())
    }

    #[test]
    fn spawns_perimeter() {
        let mut app = setup(AreaInput::new("2", "1"), orthographic());
        apply(&mut app);

        // 2x1 cells -> 6x3 segments -> 18 around
        assert_eq!(segments(&mut app).len(), 18);
        assert_eq!(*app.world().resource::<AreaInput>(), AreaInput::new("2", "1"));
    }

    #[test]
    fn regenerating_replaces_segments() {
        let mut app = setup(AreaInput::new("2", "2"), orthographic());
        apply(&mut app);
        let first = segments(&mut app);

        *app.world_mut().resource_mut::<AreaInput>() = AreaInput::new("3.6", "1");
        apply(&mut app);
        let second = segments(&mut app);

        assert_eq!(second.len(), 2 * 12 + 2 * 3);
        assert!(first.is_disjoint(&second));
        for entity in first {
            assert!(app.world().get_entity(entity).is_err());
        }
    }

    #[test]
    fn invalid_input_keeps_previous_layout() {
        let mut app = setup(AreaInput::new("1", "1"), orthographic());
        apply(&mut app);
        let first = segments(&mut app);

        *app.world_mut().resource_mut::<AreaInput>() = AreaInput::new("wide", "1");
        apply(&mut app);

        assert_eq!(segments(&mut app), first);
        assert_eq!(*app.world().resource::<AreaInput>(), AreaInput::new("wide", "1"));
    }

    #[test]
    fn frames_region_camera() {
        let mut app = setup(AreaInput::new("2", "2"), orthographic());
        apply(&mut app);

        let world = app.world_mut();
        let mut cameras = world.query_filtered::<(&Projection, &Transform), With<RegionCamera>>();
        let (projection, transform) = cameras.single(world).unwrap();

        assert_eq!(transform.translation, Vec3::new(5.0, 40.0, -2.0));
        let Projection::Orthographic(orthographic) = projection else { panic!("not orthographic") };
        // 6x6 segments, depth bound: 6 * 0.6 * 2
        assert!(matches!(
            orthographic.scaling_mode,
            bevy::camera::ScalingMode::FixedVertical { viewport_height }
                if (viewport_height - 7.2).abs() < 1e-4
        ));
    }

    #[test]
    fn perspective_camera_still_gets_fence() {
        let mut app = setup(
            AreaInput::new("1", "1"),
            Projection::Perspective(PerspectiveProjection::default()),
        );
        apply(&mut app);

        assert_eq!(segments(&mut app).len(), 12);

        let world = app.world_mut();
        let mut cameras = world.query_filtered::<(&Projection, &Transform), With<RegionCamera>>();
        let (projection, transform) = cameras.single(world).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.0, 40.0, 0.0));
        assert!(matches!(projection, Projection::Perspective(_)));
    }

    #[test]
    fn framing_perspective_fails_once() {
        let mut projection = Projection::Perspective(PerspectiveProjection::default());
        let mut transform = Transform::from_xyz(1.0, 40.0, 1.0);

        let result = frame_region(
            &mut projection,
            &mut transform,
            Dimensions::new(9, 6),
            1.0,
            Vec3::new(3.0, 0.0, 3.0),
            FRAME_MARGIN,
        );

        assert_eq!(result, Err(FramingError::NotOrthographic));
        assert!(matches!(projection, Projection::Perspective(_)));
        assert_eq!(transform, Transform::from_xyz(1.0, 40.0, 1.0));
    }

    #[test]
    fn frame_region_fits_orthographic() {
        let mut projection = orthographic();
        let mut transform = Transform::from_xyz(0.0, 40.0, 0.0);

        frame_region(&mut projection, &mut transform, Dimensions::new(10, 6), 1.0, Vec3::X, FRAME_MARGIN)
            .unwrap();

        assert_eq!(transform.translation, Vec3::new(1.0, 40.0, 0.0));
        let Projection::Orthographic(orthographic) = &projection else { panic!("not orthographic") };
        assert!(matches!(
            orthographic.scaling_mode,
            bevy::camera::ScalingMode::FixedVertical { viewport_height }
                if (viewport_height - 12.0).abs() < 1e-4
        ));
    }

    #[test]
    fn applies_once_on_startup() {
        let mut app = setup(AreaInput::new("3", "2"), orthographic());
        app.add_systems(PostStartup, request_initial_area);

        // First update runs the startup schedules, then Update.
        app.update();

        // 3x2 cells -> 9x6 segments
        assert_eq!(segments(&mut app).len(), 2 * 9 + 2 * 6);
    }

    #[test]
    fn reports_missing_references() {
        let mut world = World::new();
        let anchor = world.spawn(FenceAnchor).id();
        let rig = AreaRig { anchor, camera: None };

        let errs = world
            .run_system_once(
                move |anchors: Query<(), With<FenceAnchor>>, cameras: Query<(), With<RegionCamera>>| {
                    missing_references(true, false, Some(&rig), &anchors, &cameras)
                },
            )
            .unwrap();

        assert_eq!(errs, vec![ReferenceError::MissingPrefab, ReferenceError::MissingCamera]);
    }
}
