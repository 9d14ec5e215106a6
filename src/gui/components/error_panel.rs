// src/gui/components/error_panel.rs
//
// Blocking message for configuration errors.

use eframe::egui::{self, Align2, RichText};

use crate::gui::app::App;

pub fn draw(ctx: &egui::Context, app: &mut App) {
    let Some(msg) = app.error.clone() else { return };
    let mut dismiss = false;
    let mut retry = false;

    egui::Window::new("Configuration error")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(&msg).color(ui.visuals().error_fg_color));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                retry = ui.button("Retry load").clicked();
                dismiss = ui.button("Dismiss").clicked();
            });
        });

    if dismiss || retry {
        app.error = None;
    }
    if retry {
        app.reload();
    }
}
