// src/gui/components/analysis_bar.rs
//
// Granularity, analysis window and quick ranges.

use eframe::egui;

use crate::{
    core::{time::{format_date, parse_date}, Granularity},
    filter::QuickRange,
    gui::app::App,
};

fn date_field(ui: &mut egui::Ui, label: &str, text: &mut String) -> Option<egui::Response> {
    ui.label(label);
    let resp = ui.add(egui::TextEdit::singleline(text).desired_width(90.0).hint_text("YYYY-MM-DD"));
    (resp.lost_focus() || (resp.changed() && parse_date(text).is_some())).then_some(resp)
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Granularity:");
        let analysis = &mut app.state.options.analysis;
        for g in Granularity::ALL {
            if ui.selectable_value(&mut analysis.granularity, g, g.label()).changed() {
                logf!("UI: Granularity → {g}");
                changed = true;
            }
        }

        ui.separator();

        if date_field(ui, "From", &mut app.start_text).is_some() {
            match parse_date(&app.start_text) {
                Some(d) => {
                    app.state.options.analysis.start = Some(d);
                    changed = true;
                }
                None => app.status("From: expected YYYY-MM-DD"),
            }
        }
        if date_field(ui, "To", &mut app.end_text).is_some() {
            match parse_date(&app.end_text) {
                Some(d) => {
                    app.state.options.analysis.end = Some(d);
                    changed = true;
                }
                None => app.status("To: expected YYYY-MM-DD"),
            }
        }

        if let Some(view) = &app.view {
            ui.separator();
            ui.label(view.range.describe());
        }
    });

    ui.horizontal_wrapped(|ui| {
        ui.label("Quick:");
        for q in QuickRange::ALL {
            if ui.small_button(q.label()).clicked() {
                let (start, end) = q.apply(app.today);
                let analysis = &mut app.state.options.analysis;
                analysis.granularity = q.granularity();
                analysis.start = Some(start);
                analysis.end = Some(end);
                analysis.periods = None;
                app.start_text = format_date(&start);
                app.end_text = format_date(&end);
                logf!("UI: Quick range → {}", q.label());
                changed = true;
            }
        }
    });

    if changed {
        app.mark_dirty();
    }
}
