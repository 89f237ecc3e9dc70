use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use crate::systems::stadium::{EditKind, StadiumEdit, StadiumParams};

#[derive(Resource)]
pub struct FloodlightIndicator {
    pub on: bool,
    pub timer: f32,
    pub duration: f32,
}

impl Default for FloodlightIndicator {
    fn default() -> Self {
        Self {
            on: true,
            timer: 0.0,
            duration: 2.0,
        }
    }
}

pub fn update_floodlight_indicator(
    mut indicator: ResMut<FloodlightIndicator>,
    mut events: EventReader<StadiumEdit>,
    params: Res<StadiumParams>,
    time: Res<Time>,
) {
    for event in events.read() {
        if event.kind == EditKind::LightSwitch {
            indicator.on = params.lights.enabled;
            indicator.timer = indicator.duration;
        }
    }

    if indicator.timer > 0.0 {
        indicator.timer = (indicator.timer - time.delta_secs()).max(0.0);
    }
}

fn faded(color: egui::Color32, alpha: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (255.0 * alpha) as u8)
}

// rounded badge whose fill, outline and text all fade together
fn badge(ui: &mut egui::Ui, text: &str, fill: egui::Color32, alpha: f32, big: bool) {
    let (stroke, margin, radius, size) = if big { (2.0_f32, (20, 10), 8, 18.0) } else { (1.0_f32, (8, 6), 4, 14.0) };
    egui::Frame::new()
        .fill(faded(fill, 0.8 * alpha))
        .stroke(egui::Stroke::new(stroke, faded(egui::Color32::WHITE, 0.8 * alpha)))
        .inner_margin(egui::Margin::symmetric(margin.0, margin.1))
        .corner_radius(egui::CornerRadius::same(radius))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text)
                .size(size)
                .color(faded(egui::Color32::WHITE, alpha))
                .strong());
        });
}

// fading banner with the key hint, shown after the floodlights are switched
pub fn render_floodlight_indicator(
    indicator: Res<FloodlightIndicator>,
    mut contexts: EguiContexts,
) {
    if indicator.timer <= 0.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        const KEY_DURATION: f32 = 0.7;

        let elapsed = indicator.duration - indicator.timer;
        let main_alpha = (indicator.timer / indicator.duration).clamp(0.0, 1.0);
        // the key hint fades out faster than the state banner
        let key_alpha = (1.0 - elapsed / KEY_DURATION).clamp(0.0, 1.0);

        let (text, fill) = if indicator.on {
            ("FLOODLIGHTS ON", egui::Color32::from_rgb(176, 150, 40))
        } else {
            ("FLOODLIGHTS OFF", egui::Color32::from_rgb(60, 64, 72))
        };

        egui::Area::new(egui::Id::new("floodlight_indicator"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    badge(ui, "L", egui::Color32::from_rgb(40, 44, 52), key_alpha, false);
                    ui.add_space(4.0);
                    badge(ui, text, fill, main_alpha, true);
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_keeps_colour() {
        let color = faded(egui::Color32::from_rgb(176, 150, 40), 0.5);
        assert_eq!(color.a(), 127);
        assert_eq!(faded(egui::Color32::WHITE, 0.0).a(), 0);
    }
}
