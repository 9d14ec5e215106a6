// src/gui/actions/refresh.rs
use crate::{
    config::stages::StageMap,
    extract::HubSpotClient,
    gui::{app::App, progress::GuiProgress},
    pipeline::run_extract,
};

/// Re-extract from HubSpot, then reload the newest file.
/// Runs on the UI thread; the window is unresponsive until it returns.
pub fn refresh(app: &mut App) {
    logf!("Refresh: Begin");
    app.status("Refreshing from HubSpot…");

    let client = match HubSpotClient::from_env() {
        Ok(c) => c,
        Err(e) => return app.report("Refresh", &e),
    };
    let stages = match StageMap::resolve(app.state.options.paths.stage_map()) {
        Ok(s) => s,
        Err(e) => return app.report("Refresh", &e),
    };

    let mut prog = GuiProgress::new(app.status.clone());
    let data_dir = app.state.options.paths.data_dir.clone();
    match run_extract(&client, &stages, &data_dir, &mut prog) {
        Ok(summary) => {
            logf!("Refresh: OK deals={} warnings={}", summary.deals, summary.warnings.len());
            // a fresh extract supersedes any pinned input
            app.state.options.paths.input = None;
            app.reload();
            if !summary.warnings.is_empty() {
                app.status(format!(
                    "Refreshed {} deals ({} contact lookup warning(s))",
                    summary.deals,
                    summary.warnings.len()
                ));
            }
        }
        Err(e) => app.report("Refresh", &e),
    }
}
