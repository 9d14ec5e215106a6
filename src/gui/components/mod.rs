// src/gui/components/mod.rs
pub mod analysis_bar;
pub mod changes_table;
pub mod charts;
pub mod error_panel;
pub mod export_bar;
pub mod filter_panel;
pub mod legend;
pub mod matrix_table;
pub mod metrics;
pub mod stagnant_table;
pub mod tabs;
pub mod top_bar;
pub mod warnings;

use eframe::egui::Color32;

use crate::config::stages::{parse_hex_color, StageGroup, StageMap};

// Fallback fills for stages without a configured color.
const GROUP_FILL: [(StageGroup, Color32); 6] = [
    (StageGroup::Entry, Color32::from_rgb(0xe3, 0xf2, 0xfd)),
    (StageGroup::Qualification, Color32::from_rgb(0xff, 0xf3, 0xe0)),
    (StageGroup::Conversion, Color32::from_rgb(0xc8, 0xe6, 0xc9)),
    (StageGroup::FollowUp, Color32::from_rgb(0xfc, 0xe4, 0xec)),
    (StageGroup::Negative, Color32::from_rgb(0xff, 0xcd, 0xd2)),
    (StageGroup::Neutral, Color32::from_rgb(0xee, 0xee, 0xee)),
];

/// Cell fill for a stage: configured color, else its group's color.
pub(crate) fn stage_fill(stages: &StageMap, name: &str) -> Color32 {
    let Some(def) = stages.by_name(name) else {
        return Color32::from_gray(0xdd);
    };
    if let Some((r, g, b)) = def.color.as_deref().and_then(parse_hex_color) {
        return Color32::from_rgb(r, g, b);
    }
    GROUP_FILL
        .iter()
        .find(|(g, _)| *g == def.group)
        .map(|(_, c)| *c)
        .unwrap_or(Color32::from_gray(0xdd))
}

/// Stage fills are pastel; text on them stays dark in both themes.
pub(crate) const STAGE_TEXT: Color32 = Color32::from_rgb(0x21, 0x21, 0x21);

/// Deal page in the CRM, when a portal id is configured.
pub(crate) fn deal_url(portal_id: &str, deal_id: &str) -> String {
    format!("{}/{}/record/0-3/{}", crate::config::consts::DEAL_URL_BASE, portal_id, deal_id)
}
