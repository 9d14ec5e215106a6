// src/gui/components/filter_panel.rs
//
// Left sidebar: every deal filter. Any change marks the view dirty.

use std::collections::BTreeSet;

use eframe::egui;

use crate::{
    config::consts::MAX_STAGNANT_THRESHOLD,
    core::time::{format_date, parse_date},
    filter::{campaign_options, name_options, CreationQuick},
    gui::app::App,
};

/// Checkbox list over `options`; returns true if the picks changed.
fn pick_list(ui: &mut egui::Ui, id: &str, options: &[String], picked: &mut BTreeSet<String>) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(format!("{} of {} selected", picked.len(), options.len()));
        if !picked.is_empty() && ui.small_button("Clear").clicked() {
            picked.clear();
            changed = true;
        }
    });
    egui::ScrollArea::vertical()
        .id_salt(id)
        .max_height(160.0)
        .show(ui, |ui| {
            for opt in options {
                let mut on = picked.contains(opt);
                if ui.checkbox(&mut on, opt.as_str()).changed() {
                    if on { picked.insert(opt.clone()); } else { picked.remove(opt); }
                    changed = true;
                }
            }
        });
    changed
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(raw) = app.raw.as_ref() else {
        ui.label("Filters appear once a deals file is loaded.");
        return;
    };
    // snapshot the option lists so the filter can be borrowed mutably below
    let names = name_options(raw.deals());
    let campaigns = campaign_options(raw.deals());
    let stage_names: Vec<String> = raw.stages().names().map(String::from).collect();

    let mut changed = false;
    ui.heading("Filters");

    let filter = &mut app.state.options.filter;
    if ui
        .checkbox(&mut filter.show_all, "Show All Deals")
        .on_hover_text("Bypass every filter except the stagnant filter")
        .changed()
    {
        logf!("UI: show_all → {}", filter.show_all);
        changed = true;
    }

    ui.add_enabled_ui(!filter.show_all, |ui| {
        ui.separator();
        ui.strong("Deal Creation Date");
        ui.horizontal(|ui| {
            for q in CreationQuick::ALL {
                if ui.small_button(q.label()).clicked() {
                    q.apply(filter, app.today);
                    app.created_from_text = filter.created_from.map(|d| format_date(&d)).unwrap_or_default();
                    app.created_to_text = filter.created_to.map(|d| format_date(&d)).unwrap_or_default();
                    changed = true;
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label("From");
            let r = ui.add(egui::TextEdit::singleline(&mut app.created_from_text).desired_width(90.0).hint_text("any"));
            if r.lost_focus() {
                filter.created_from = parse_date(&app.created_from_text);
                changed = true;
            }
            ui.label("To");
            let r = ui.add(egui::TextEdit::singleline(&mut app.created_to_text).desired_width(90.0).hint_text("any"));
            if r.lost_focus() {
                filter.created_to = parse_date(&app.created_to_text);
                changed = true;
            }
        });

        ui.separator();
        ui.strong("Deal Name");
        if ui
            .add(egui::TextEdit::singleline(&mut filter.name_query).hint_text("contains…"))
            .changed()
        {
            changed = true;
        }
        egui::CollapsingHeader::new("Pick deals").id_salt("pick_deals").show(ui, |ui| {
            changed |= pick_list(ui, "deal_names", &names, &mut filter.names);
        });

        ui.separator();
        ui.strong("Lemlist Campaign");
        if campaigns.is_empty() {
            ui.label("No campaigns in this file");
        } else {
            changed |= pick_list(ui, "campaigns", &campaigns, &mut filter.campaigns);
        }

        ui.separator();
        ui.strong("Current Stage");
        egui::CollapsingHeader::new("Only these stages").id_salt("stage_in").show(ui, |ui| {
            changed |= pick_list(ui, "stages_in", &stage_names, &mut filter.include_stages);
        });
        egui::CollapsingHeader::new("Hide these stages").id_salt("stage_out").show(ui, |ui| {
            changed |= pick_list(ui, "stages_out", &stage_names, &mut filter.exclude_stages);
        });
    });

    ui.separator();
    ui.strong("Stagnant Deals");
    let mut threshold = filter.stagnant_threshold;
    if ui
        .add(egui::Slider::new(&mut threshold, 1..=MAX_STAGNANT_THRESHOLD).text("periods"))
        .on_hover_text("Stagnant = more than N periods in the current stage")
        .changed()
    {
        filter.set_threshold(threshold);
        changed = true;
    }
    if ui.checkbox(&mut filter.stagnant_only, "Show only stagnant deals").changed() {
        changed = true;
    }

    if changed {
        logd!("UI: filters → {}", app.state.options.filter.describe());
        app.mark_dirty();
    }

    if let Some(view) = &app.view {
        ui.separator();
        ui.label(format!("After deal filters: {}", view.prefiltered));
        ui.label(format!("Shown: {}", view.table.series.len()));
        if app.state.options.filter.show_all {
            ui.label("Stage filter bypassed");
        }
    }
}
