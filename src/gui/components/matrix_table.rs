// src/gui/components/matrix_table.rs
//
// Deal × period stage matrix. Cells are filled with the stage color;
// deal names link to the CRM when a portal id is configured.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::{core::time::format_date, gui::app::App};
use super::{deal_url, stage_fill, STAGE_TEXT};

const FIXED: [(&str, f32); 4] = [("Deal Name", 200.0), ("Deal ID", 90.0), ("Created", 80.0), ("Lemlist Campaign", 140.0)];

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let (Some(raw), Some(view)) = (&app.raw, &app.view) else {
        ui.label("Nothing to show.");
        return;
    };
    let table = &view.table;
    if table.series.is_empty() {
        ui.label("No deals found for the selected filters.");
        return;
    }
    let stages = raw.stages();
    let g = table.range.granularity;
    let period_keys: Vec<String> = table.periods.iter().map(|p| g.key(p.start)).collect();
    let portal = app.portal_id.as_deref();

    let avail_h = ui.available_height();
    egui::ScrollArea::horizontal()
        .id_salt("matrix_hscroll")
        .show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .min_scrolled_height(0.0)
                .max_scroll_height(avail_h)
                .id_salt(("matrix", table.periods.len()))
                .cell_layout(Layout::left_to_right(Align::Center));
            for (_, w) in FIXED {
                builder = builder.column(Column::initial(w).resizable(true).clip(true).at_least(40.0));
            }
            for _ in &period_keys {
                builder = builder.column(Column::initial(92.0).resizable(true).clip(true).at_least(30.0));
            }

            builder
                .header(24.0, |mut header| {
                    for (name, _) in FIXED {
                        header.col(|ui| { ui.strong(name); });
                    }
                    for key in &period_keys {
                        header.col(|ui| { ui.strong(key); });
                    }
                })
                .body(|body| {
                    body.rows(20.0, table.series.len(), |mut row| {
                        let s = &table.series[row.index()];
                        row.col(|ui| {
                            ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                            let resp = match portal {
                                Some(pid) => ui.hyperlink_to(&s.deal_name, deal_url(pid, &s.deal_id)),
                                None => ui.label(&s.deal_name),
                            };
                            if !s.contact.is_empty() {
                                resp.on_hover_text(format!("Last contact: {}", s.contact));
                            }
                        });
                        row.col(|ui| { ui.label(&s.deal_id); });
                        row.col(|ui| { ui.label(format_date(&s.created_at.date_naive())); });
                        row.col(|ui| { ui.label(&s.campaign); });

                        for ix in 0..period_keys.len() {
                            let cell = s.cell_at(ix);
                            row.col(|ui| {
                                let Some(stage) = cell.and_then(|c| c.stage.as_deref()) else { return };
                                ui.painter().rect_filled(ui.max_rect(), 0.0, stage_fill(stages, stage));
                                let resp = ui.label(RichText::new(stage).color(STAGE_TEXT).small());
                                if let Some(t) = cell.and_then(|c| c.entered_at) {
                                    resp.on_hover_text(format!("entered {}", t.format("%Y-%m-%d %H:%M UTC")));
                                }
                            });
                        }
                    });
                });
        });
}
