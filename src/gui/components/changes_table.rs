// src/gui/components/changes_table.rs
use eframe::egui::{self, Align, Layout, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{core::time::format_date, gui::app::App};
use super::{stage_fill, STAGE_TEXT};

const HEADERS: [&str; 6] = ["Deal Name", "Period", "From", "To", "Changed At", "Deal ID"];

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let (Some(raw), Some(view)) = (&app.raw, &app.view) else {
        ui.label("Nothing to show.");
        return;
    };
    if view.changes.is_empty() {
        ui.label("No stage changes in this window.");
        return;
    }
    let stages = raw.stages();
    let g = view.range.granularity;

    let stage_cell = |ui: &mut egui::Ui, stage: Option<&str>| match stage {
        Some(s) => {
            ui.painter().rect_filled(ui.max_rect(), 0.0, stage_fill(stages, s));
            ui.label(RichText::new(s).color(STAGE_TEXT));
        }
        None => { ui.weak("(none)"); }
    };

    TableBuilder::new(ui)
        .striped(true)
        .id_salt("changes")
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::initial(220.0).resizable(true).clip(true))
        .column(Column::initial(90.0).resizable(true))
        .column(Column::initial(160.0).resizable(true).clip(true))
        .column(Column::initial(160.0).resizable(true).clip(true))
        .column(Column::initial(130.0).resizable(true))
        .column(Column::remainder())
        .header(24.0, |mut header| {
            for h in HEADERS {
                header.col(|ui| { ui.strong(h); });
            }
        })
        .body(|body| {
            body.rows(20.0, view.changes.len(), |mut row| {
                let c = &view.changes[row.index()];
                row.col(|ui| { ui.label(&c.deal_name); });
                row.col(|ui| { ui.label(g.key(c.period.start)); });
                row.col(|ui| stage_cell(ui, c.previous_stage.as_deref()));
                row.col(|ui| stage_cell(ui, c.current_stage.as_deref()));
                row.col(|ui| {
                    let text = c.changed_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string());
                    ui.label(text.unwrap_or_else(|| format_date(&c.period.start)));
                });
                row.col(|ui| { ui.label(&c.deal_id); });
            });
        });
}
