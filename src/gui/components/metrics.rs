// src/gui/components/metrics.rs
use eframe::egui::{self, RichText};

use crate::gui::app::App;

fn stat(ui: &mut egui::Ui, label: &str, value: impl ToString) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value.to_string()).size(22.0).strong());
    });
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(view) = &app.view else {
        ui.label("No deals to analyse.");
        return;
    };
    let m = &view.metrics;
    let stagnant = view.stagnant_over(app.state.options.filter.stagnant_threshold).count();

    ui.horizontal(|ui| {
        stat(ui, "Deals shown", m.deals);
        ui.add_space(24.0);
        stat(ui, "Periods analysed", m.periods);
        ui.add_space(24.0);
        stat(ui, "Deals with stage changes", m.deals_with_changes);
        ui.add_space(24.0);
        stat(ui, "Total stage changes", m.stage_changes);
        ui.add_space(24.0);
        stat(ui, format!("Stagnant > {}", app.state.options.filter.stagnant_threshold).as_str(), stagnant);
        ui.add_space(24.0);
        stat(ui, "Pipeline amount", format!("{:.0}", m.pipeline_amount));
    });
}
