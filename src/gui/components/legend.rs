// src/gui/components/legend.rs
use eframe::egui::{self, RichText};

use crate::{config::stages::StageGroup, gui::app::App};
use super::{stage_fill, STAGE_TEXT};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(raw) = &app.raw else { return };
    let stages = raw.stages();

    ui.strong("Stage Legend");
    ui.horizontal_wrapped(|ui| {
        for group in StageGroup::ALL {
            let members: Vec<&str> = stages
                .stages()
                .iter()
                .filter(|s| s.group == group)
                .map(|s| s.name.as_str())
                .collect();
            if members.is_empty() { continue; }

            ui.label(RichText::new(format!("{}:", group.label())).small());
            for name in members {
                let chip = egui::Button::new(RichText::new(name).color(STAGE_TEXT).small())
                    .fill(stage_fill(stages, name))
                    .sense(egui::Sense::hover());
                ui.add(chip);
            }
            ui.add_space(12.0);
        }
    });
}
