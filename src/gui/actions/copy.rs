// src/gui/actions/copy.rs
use eframe::egui;
use crate::{csv::rows_to_string, gui::app::App};

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    let Some((table, _)) = super::current_table(app) else {
        app.status("Nothing to copy (no data loaded)");
        logd!("Copy: Clicked, but there's no view");
        return;
    };
    if table.is_empty() {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but the table is empty");
        return;
    }

    let export = &app.state.options.export;
    let headers = if export.include_headers { table.headers.as_deref() } else { None };
    let txt = rows_to_string(headers, &table.rows, export.format.delimiter());
    logf!("Copy: tab={:?}, rows={}", app.tab(), table.len());

    ui_ctx.copy_text(txt);
    app.status(format!("Copied {} row(s) to clipboard", table.len()));
}
