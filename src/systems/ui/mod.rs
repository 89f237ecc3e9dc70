use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::config::MAX_TIERS;
use crate::systems::stadium::{
    EditKind, LightStyle, RoofStyle, Side, Sport, StadiumEdit, StadiumParams, StandShape,
};

pub mod indicator;

// re-export the main items that other modules need
pub use indicator::{FloodlightIndicator, update_floodlight_indicator, render_floodlight_indicator};

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(FloodlightIndicator::default())
            .add_systems(Update, (key_input, update_floodlight_indicator))
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, render_floodlight_indicator)); // UI rendering here
    }
}

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut params: ResMut<StadiumParams>,
    mut edits: EventWriter<StadiumEdit>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyL) {
        params.lights.enabled = !params.lights.enabled;
        edits.write(StadiumEdit { kind: EditKind::LightSwitch });
    }
}

// which rebuild chains the panel touched this frame
#[derive(Default)]
struct Touched {
    sport: bool,
    stands: bool,
    roof: bool,
    lights: bool,
    switch: bool,
}

impl Touched {
    fn kinds(&self) -> impl Iterator<Item = EditKind> {
        [
            (self.sport, EditKind::Sport),
            (self.stands, EditKind::Stands),
            (self.roof, EditKind::Roof),
            (self.lights, EditKind::Lights),
            (self.switch, EditKind::LightSwitch),
        ]
        .into_iter()
        .filter_map(|(touched, kind)| touched.then_some(kind))
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) -> bool {
    let srgba = color.to_srgba();
    let mut rgb = [srgba.red, srgba.green, srgba.blue];
    let changed = ui
        .horizontal(|ui| {
            let changed = ui.color_edit_button_rgb(&mut rgb).changed();
            ui.label(label);
            changed
        })
        .inner;
    if changed {
        *color = Color::srgb(rgb[0], rgb[1], rgb[2]);
    }
    changed
}

fn choice<T: PartialEq + Copy>(ui: &mut egui::Ui, label: &str, value: &mut T, options: &[(T, &str)]) -> bool {
    let selected = options
        .iter()
        .find(|(option, _)| *option == *value)
        .map_or("", |(_, name)| *name);
    let mut changed = false;
    egui::ComboBox::from_label(label)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (option, name) in options {
                changed |= ui.selectable_value(value, *option, *name).changed();
            }
        });
    changed
}

fn ui_main(
    mut contexts: EguiContexts,
    mut params: ResMut<StadiumParams>,
    mut edits: EventWriter<StadiumEdit>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        let mut touched = Touched::default();

        egui::SidePanel::left("config_panel")
            .default_width(200.0)
            .min_width(250.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB / QE - Rotate");

                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::CollapsingHeader::new("Stadium")
                        .default_open(true)
                        .show(ui, |ui| {
                        touched.sport |= choice(ui, "Sport", &mut params.sport, &[
                            (Sport::Football, "Football"),
                            (Sport::Cricket, "Cricket"),
                        ]);
                        touched.stands |= ui.add(egui::Slider::new(&mut params.stands.footprint.length, 0.8..=1.5)
                            .text("Footprint Length"))
                            .on_hover_text("Scales the stadium along the pitch, independent of the pitch size.")
                            .changed();
                        touched.stands |= ui.add(egui::Slider::new(&mut params.stands.footprint.width, 0.8..=1.5)
                            .text("Footprint Width"))
                            .on_hover_text("Scales the stadium across the pitch.")
                            .changed();
                    });

                    egui::CollapsingHeader::new("Stands")
                        .default_open(true)
                        .show(ui, |ui| {
                        let stands = &mut params.stands;
                        touched.stands |= ui.add(egui::Slider::new(&mut stands.height, 5.0..=30.0)
                            .text("Height (m)")
                            .suffix(" m"))
                            .on_hover_text("Total stand height, split evenly between tiers.")
                            .changed();
                        touched.stands |= ui.add(egui::Slider::new(&mut stands.tiers, 1..=MAX_TIERS)
                            .text("Tiers"))
                            .changed();
                        touched.stands |= ui.add(egui::Slider::new(&mut stands.tier_spacing, 0.5..=2.0)
                            .text("Tier Setback (m)")
                            .suffix(" m"))
                            .on_hover_text("How far each tier steps back from the one below.")
                            .changed();
                        touched.stands |= choice(ui, "Shape", &mut stands.shape, &[
                            (StandShape::Rectangular, "Rectangular"),
                            (StandShape::Curved, "Curved"),
                            (StandShape::Asymmetric, "Asymmetric"),
                        ]);
                        touched.stands |= ui.add(egui::Slider::new(&mut stands.bowl_corners, 0.0..=1.0)
                            .text("Bowl Corners"))
                            .on_hover_text("Fills the corners between stands. 0 leaves them open.")
                            .changed();
                        touched.stands |= color_row(ui, "Stand Color", &mut stands.color);
                        touched.stands |= color_row(ui, "Seat Color", &mut stands.seat_color);

                        ui.separator();
                        touched.stands |= ui.checkbox(&mut stands.premium.enabled, "Premium Tier").changed();
                        if stands.premium.enabled {
                            let top = stands.tiers.saturating_sub(1);
                            touched.stands |= ui.add(egui::Slider::new(&mut stands.premium.tier, 0..=top)
                                .text("Premium Level"))
                                .changed();
                            touched.stands |= color_row(ui, "Premium Stand", &mut stands.premium.stand_color);
                            touched.stands |= color_row(ui, "Premium Seats", &mut stands.premium.seat_color);
                        }
                    });

                    egui::CollapsingHeader::new("Per-side Stands")
                        .default_open(false)
                        .show(ui, |ui| {
                        for side in Side::ALL {
                            let custom = &mut params.stands.sides[side.index()];
                            egui::CollapsingHeader::new(format!("{} Stand", side.label()))
                                .show(ui, |ui| {
                                touched.stands |= ui.checkbox(&mut custom.custom, "Override").changed();
                                if custom.custom {
                                    touched.stands |= ui.add(egui::Slider::new(&mut custom.height, 5.0..=30.0)
                                        .text("Height (m)")
                                        .suffix(" m"))
                                        .changed();
                                    touched.stands |= ui.add(egui::Slider::new(&mut custom.tiers, 1..=MAX_TIERS)
                                        .text("Tiers"))
                                        .changed();
                                    touched.stands |= color_row(ui, "Stand Color", &mut custom.color);
                                    touched.stands |= color_row(ui, "Seat Color", &mut custom.seat_color);
                                }
                            });
                        }
                    });

                    egui::CollapsingHeader::new("Roof")
                        .default_open(true)
                        .show(ui, |ui| {
                        let roof = &mut params.roof;
                        touched.roof |= choice(ui, "Style", &mut roof.style, &[
                            (RoofStyle::Unified, "Unified"),
                            (RoofStyle::PerSide, "Per Side"),
                        ]);
                        touched.roof |= color_row(ui, "Roof Color", &mut roof.color);
                        touched.roof |= ui.add(egui::Slider::new(&mut roof.opacity, 0.1..=1.0)
                            .text("Opacity"))
                            .on_hover_text("1 is fully opaque.")
                            .changed();
                        touched.roof |= color_row(ui, "Support Color", &mut roof.support_color);
                        if roof.style == RoofStyle::Unified {
                            touched.roof |= ui.checkbox(&mut roof.grid_texture, "Panel Texture").changed();
                        }

                        if roof.style == RoofStyle::PerSide {
                            for side in Side::ALL {
                                let custom = &mut roof.sides[side.index()];
                                egui::CollapsingHeader::new(format!("{} Canopy", side.label()))
                                    .show(ui, |ui| {
                                    touched.roof |= ui.checkbox(&mut custom.custom, "Override").changed();
                                    if custom.custom {
                                        touched.roof |= ui.checkbox(&mut custom.enabled, "Enabled").changed();
                                        touched.roof |= ui.add(egui::Slider::new(&mut custom.height, 5.0..=40.0)
                                            .text("Height (m)")
                                            .suffix(" m"))
                                            .changed();
                                        touched.roof |= color_row(ui, "Color", &mut custom.color);
                                        touched.roof |= ui.add(egui::Slider::new(&mut custom.opacity, 0.1..=1.0)
                                            .text("Opacity"))
                                            .changed();
                                    }
                                });
                            }
                        }
                    });

                    egui::CollapsingHeader::new("Floodlights")
                        .default_open(true)
                        .show(ui, |ui| {
                        let lights = &mut params.lights;
                        touched.switch |= ui.checkbox(&mut lights.enabled, "On (L)").changed();
                        touched.lights |= choice(ui, "Style", &mut lights.style, &[
                            (LightStyle::FloodCorner, "Flood Corner"),
                            (LightStyle::ModernBank, "Modern Bank"),
                            (LightStyle::ClassicPole, "Classic Pole"),
                            (LightStyle::AngledCorner, "Angled Corner"),
                        ]);
                        touched.lights |= ui.add(egui::Slider::new(&mut lights.pole_height, 20.0..=60.0)
                            .text("Pole Height (m)")
                            .suffix(" m"))
                            .on_hover_text("Should clear the stands for the lights to reach the pitch.")
                            .changed();
                        touched.lights |= color_row(ui, "Light Color", &mut lights.color);
                        touched.lights |= ui.add(egui::Slider::new(&mut lights.intensity, 0.0..=5.0)
                            .text("Intensity"))
                            .changed();
                        touched.lights |= ui.checkbox(&mut lights.shadows, "Shadows").changed();
                    });
                });

                ui.separator();
                ui.label("ESC - Exit");
            });

        for kind in touched.kinds() {
            edits.write(StadiumEdit { kind });
        }
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                        if let Some(fps) = fps_diagnostic.smoothed() {
                            ui.label(egui::RichText::new(format!("{:.0}", fps))
                                .size(26.0)
                                .color(egui::Color32::WHITE));
                        }
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_maps_to_edit_kinds() {
        let touched = Touched { stands: true, switch: true, ..default() };
        assert_eq!(touched.kinds().collect::<Vec<_>>(), vec![EditKind::Stands, EditKind::LightSwitch]);
        assert_eq!(Touched::default().kinds().count(), 0);
    }
}
