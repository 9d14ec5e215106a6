// src/gui/components/warnings.rs
use eframe::egui;

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(raw) = &app.raw else { return };
    let warnings = raw.warnings();
    if warnings.is_empty() {
        ui.label(format!("No data-quality warnings ({} rows read).", raw.rows_read()));
        return;
    }
    ui.label(format!(
        "{} warning(s) over {} rows; {} row(s) skipped.",
        warnings.len(),
        raw.rows_read(),
        raw.skipped()
    ));
    egui::ScrollArea::vertical().id_salt("warnings").show_rows(ui, 18.0, warnings.len(), |ui, range| {
        for w in &warnings[range] {
            ui.monospace(w.to_string());
        }
    });
}
