// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{copy,export,refresh}.

mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs
mod refresh; // src/gui/actions/refresh.rs

pub use copy::copy;
pub use export::{export, export_summary};
pub use refresh::refresh;

use crate::{
    analysis::stagnant_dataset,
    config::{consts::*, state::TableTab},
    gui::app::App,
    store::DataSet,
};

/// The table behind the active tab, as displayed.
pub(super) fn current_table(app: &App) -> Option<(DataSet, &'static str)> {
    match app.tab() {
        TableTab::Warnings => {
            let raw = app.raw.as_ref()?;
            let rows = raw
                .warnings()
                .iter()
                .map(|w| vec![w.line.to_string(), w.deal_id.clone(), w.message.clone()])
                .collect();
            Some((DataSet::with_headers(&["line", "deal_id", "message"], rows), "data_warnings"))
        }
        tab => {
            let view = app.view.as_ref()?;
            Some(match tab {
                TableTab::Matrix => (view.table.matrix_dataset(), MATRIX_STEM),
                TableTab::Changes => (view.table.changes_dataset(), CHANGES_STEM),
                _ => {
                    let threshold = app.state.options.filter.stagnant_threshold;
                    let rows: Vec<_> = view.stagnant_over(threshold).cloned().collect();
                    (stagnant_dataset(&rows), STAGNANT_STEM)
                }
            })
        }
    }
}
