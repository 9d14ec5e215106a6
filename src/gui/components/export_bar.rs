// src/gui/components/export_bar.rs

use eframe::egui;

use crate::{
    config::options::ExportFormat,
    gui::{actions, app::App},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        let export = &mut app.state.options.export;

        // --- Format + Include headers ---
        ui.label("Format:");
        for f in ExportFormat::ALL {
            if ui.selectable_value(&mut export.format, f, f.label()).changed() {
                logf!("UI: Export format → {:?}", export.format);
            }
        }

        let before_headers = export.include_headers;
        ui.checkbox(&mut export.include_headers, "Include headers");
        if export.include_headers != before_headers {
            logf!("UI: Include_headers → {}", export.include_headers);
        }

        ui.separator();

        // --- Output directory ---
        ui.label("Output dir:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_dir_text)
                .desired_width(220.0)
                .font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_dir_dirty = true;
            logd!("UI: out_dir_text changed (dirty=true) → {}", app.out_dir_text);
        }

        ui.separator();

        // --- Actions ---
        let tab = app.tab().label();
        if ui.button("Copy").on_hover_text(format!("Copy {tab} to the clipboard")).clicked() {
            actions::copy(app, ui.ctx());
        }
        if ui.button("Export").on_hover_text(format!("Write {tab} to the output dir")).clicked() {
            actions::export(app);
        }
        if ui.button("Export summary").on_hover_text("Write summary.json").clicked() {
            actions::export_summary(app);
        }
    });
}
