// src/gui/components/stagnant_table.rs
use eframe::egui::{self, Align, Layout, RichText};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;
use super::{stage_fill, STAGE_TEXT};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let (Some(raw), Some(view)) = (&app.raw, &app.view) else {
        ui.label("Nothing to show.");
        return;
    };
    let threshold = app.state.options.filter.stagnant_threshold;
    let rows: Vec<_> = view.stagnant_over(threshold).collect();
    if rows.is_empty() {
        ui.label(format!("No deals stagnant for more than {threshold} periods."));
        return;
    }
    let stages = raw.stages();
    let unit = view.range.granularity.unit();
    ui.label(format!("{} deal(s) in the same stage for more than {threshold} {unit}", rows.len()));

    TableBuilder::new(ui)
        .striped(true)
        .id_salt("stagnant")
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::initial(240.0).resizable(true).clip(true))
        .column(Column::initial(180.0).resizable(true).clip(true))
        .column(Column::initial(80.0))
        .column(Column::initial(80.0))
        .column(Column::remainder())
        .header(24.0, |mut header| {
            for h in ["Deal Name", "Current Stage", "Periods", "Known", "Deal ID"] {
                header.col(|ui| { ui.strong(h); });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let d = rows[row.index()];
                row.col(|ui| { ui.label(&d.deal_name); });
                row.col(|ui| {
                    ui.painter().rect_filled(ui.max_rect(), 0.0, stage_fill(stages, &d.current_stage));
                    ui.label(RichText::new(&d.current_stage).color(STAGE_TEXT));
                });
                row.col(|ui| { ui.label(d.stagnant_periods.to_string()); });
                row.col(|ui| { ui.label(d.total_periods.to_string()); });
                row.col(|ui| { ui.label(&d.deal_id); });
            });
        });
}
