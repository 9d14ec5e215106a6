// src/gui/actions/export.rs
use crate::{
    analysis::Summary,
    config::consts::SUMMARY_FILE,
    file::{write_json, write_table},
    gui::app::App,
};

fn commit_out_dir(app: &mut App) {
    if app.out_dir_dirty {
        app.state.options.export.set_dir(&app.out_dir_text);
        logf!("Export: Out dir set → {}", app.state.options.export.out_dir.display());
        app.out_dir_dirty = false;
    }
}

/// Write the active tab's table into the output directory.
pub fn export(app: &mut App) {
    commit_out_dir(app);

    let Some((table, stem)) = super::current_table(app) else {
        logd!("Export: Clicked, but there's no view");
        return app.status("Nothing to export (no data loaded)");
    };
    if table.is_empty() {
        logd!("Export: Clicked, but the table is empty");
        return app.status("Nothing to export");
    }

    let export = &app.state.options.export;
    let path = export.path_for(stem);
    logf!("Export: Begin tab={:?}, rows={}, path={}", app.tab(), table.len(), path.display());

    let msg = match write_table(&path, &table, export) {
        Ok(p) => {
            logf!("Export: OK → {}", p.display());
            format!("Exported {} row(s) to {}", table.len(), p.display())
        }
        Err(e) => {
            loge!("Export: Error: {}", e);
            format!("Export error: {e}")
        }
    };
    app.status(msg);
}

/// Write `summary.json` for the current view.
pub fn export_summary(app: &mut App) {
    commit_out_dir(app);

    let (Some(raw), Some(view)) = (app.raw.as_ref(), app.view.as_ref()) else {
        return app.status("Nothing to export (no data loaded)");
    };
    let summary = Summary::build(
        &view.table,
        raw.stages(),
        app.state.options.filter.stagnant_threshold,
        raw.source_owned(),
        raw.warnings().len(),
    );
    let path = app.state.options.export.out_dir.join(SUMMARY_FILE);

    let msg = match write_json(&path, &summary) {
        Ok(p) => {
            logf!("Export: summary → {}", p.display());
            format!("Exported summary to {}", p.display())
        }
        Err(e) => {
            loge!("Export: summary error: {}", e);
            format!("Export error: {e}")
        }
    };
    app.status(msg);
}
