// src/gui/components/tabs.rs
use eframe::egui;

use crate::{config::state::TableTab, gui::app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let warnings = app.raw.as_ref().map(|r| r.warnings().len()).unwrap_or(0);
    let changes = app.view.as_ref().map(|v| v.changes.len()).unwrap_or(0);

    ui.horizontal(|ui| {
        for tab in TableTab::ALL {
            let text = match tab {
                TableTab::Changes => format!("{} ({changes})", tab.label()),
                TableTab::Warnings => format!("{} ({warnings})", tab.label()),
                _ => s!(tab.label()),
            };
            if ui.selectable_value(&mut app.state.gui.tab, tab, text).changed() {
                logd!("UI: tab → {:?}", tab);
            }
        }
    });
}
