//! Region panel, mode bar and debug inspectors.

use bevy::input::common_conditions::input_toggle_active;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use crate::SetupSet;
use crate::area::{AreaInput, AreaSettings, ApplyArea};
use crate::mode::{GameMode, ModePanel, ModeRig, SelectMode};
use crate::sun::SunSettings;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<EguiPlugin>() {
        app.add_plugins(EguiPlugin::default());
    }

    app.add_plugins(
        ResourceInspectorPlugin::<AreaSettings>::default()
            .run_if(input_toggle_active(false, KeyCode::F1)),
    )
    .add_plugins(
        ResourceInspectorPlugin::<SunSettings>::default()
            .run_if(input_toggle_active(false, KeyCode::F1)),
    );

    app.add_systems(Startup, spawn_panels.in_set(SetupSet::Spawn));
    app.add_systems(EguiPrimaryContextPass, (mode_bar, region_window).chain());
}

fn hint_text(text: &'static str) -> impl Bundle {
    (
        Text::new(text),
        TextFont { font_size: 16.0, ..default() },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
    )
}

/// One panel per mode, hidden until its mode is selected.
pub fn spawn_panels(mut commands: Commands) {
    let panel = Node {
        position_type: PositionType::Absolute,
        bottom: Val::Px(12.0),
        left: Val::Px(12.0),
        padding: UiRect::all(Val::Px(8.0)),
        ..default()
    };

    commands.spawn((
        Name::new("Region Panel"),
        ModePanel(GameMode::RegionSelect),
        panel.clone(),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Visibility::Hidden,
        children![hint_text("Enter the region size in cells and press Apply. 2 switches to the main view.")],
    ));

    commands.spawn((
        Name::new("Main Panel"),
        ModePanel(GameMode::Main),
        panel,
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Visibility::Hidden,
        children![hint_text("Main view. 1 or Tab goes back to region select.")],
    ));
}

pub fn mode_bar(
    mut contexts: EguiContexts,
    rig: Option<Res<ModeRig>>,
    mut writer: MessageWriter<SelectMode>,
) -> Result {
    let Some(rig) = rig else { return Ok(()) };
    let ctx = contexts.ctx_mut()?;

    egui::TopBottomPanel::top("modes").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for mode in GameMode::ALL {
                let label = if rig.is_active(mode) {
                    egui::RichText::new(mode.label()).strong()
                } else {
                    egui::RichText::new(mode.label())
                };

                if ui.button(label).clicked() {
                    writer.write(mode.into());
                }
            }
        });
    });

    Ok(())
}

/// Size fields of the region panel, drawn while that panel is shown.
pub fn region_window(
    mut contexts: EguiContexts,
    mut input: ResMut<AreaInput>,
    panels: Query<(&ModePanel, &Visibility)>,
    mut writer: MessageWriter<ApplyArea>,
) -> Result {
    let shown = panels
        .iter()
        .any(|(panel, visibility)| panel.0 == GameMode::RegionSelect && *visibility != Visibility::Hidden);
    if !shown {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    egui::Window::new("Region").resizable(false).show(ctx, |ui| {
        egui::Grid::new("region_size").num_columns(2).show(ui, |ui| {
            ui.label("Width");
            ui.text_edit_singleline(&mut input.width_text);
            ui.end_row();

            ui.label("Depth");
            ui.text_edit_singleline(&mut input.depth_text);
            ui.end_row();
        });

        if ui.button("Apply").clicked() {
            writer.write(ApplyArea);
        }
    });

    Ok(())
}
