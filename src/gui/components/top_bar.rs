// src/gui/components/top_bar.rs
//
// Title, data freshness, Refresh and the status line.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use eframe::egui::{self, RichText};

use crate::gui::{actions, app::App};

fn freshness(app: &App) -> String {
    let Some(raw) = &app.raw else { return s!("No data loaded") };
    let file = raw
        .source()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| s!("?"));
    let when = raw.modified().map(|t| {
        let dt: DateTime<Utc> = t.into();
        let age = SystemTime::now().duration_since(t).map(|d| d.as_secs() / 3600).unwrap_or(0);
        format!("{} UTC ({}h ago)", dt.format("%Y-%m-%d %H:%M"), age)
    });
    match when {
        Some(w) => format!("Data: {file}, updated {w}, {} deals", raw.deals().len()),
        None => format!("Data: {file}, {} deals", raw.deals().len()),
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        ui.heading("Deal Stage Dashboard");
        ui.separator();
        ui.label(freshness(app));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let refresh = egui::Button::new(RichText::new("Refresh").strong())
                .fill(egui::Color32::from_rgb(0x2e, 0x7d, 0x32));
            if ui
                .add(refresh)
                .on_hover_text("Re-extract all deals from HubSpot, then reload")
                .clicked()
            {
                actions::refresh(app);
            }
            ui.checkbox(&mut app.state.gui.show_legend, "Legend");
            ui.checkbox(&mut app.state.gui.show_charts, "Charts");
        });
    });

    ui.horizontal(|ui| {
        ui.label(format!("Status: {}", app.status_text()));
        if let Some(raw) = &app.raw {
            if raw.skipped() > 0 {
                ui.label(
                    RichText::new(format!("{} row(s) skipped", raw.skipped()))
                        .color(ui.visuals().warn_fg_color),
                );
            }
        }
    });
}
