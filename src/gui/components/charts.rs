// src/gui/components/charts.rs
//
// Two painter-drawn charts: stacked stage distribution per period and
// current-stage counts.

use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke};

use crate::{analysis::PeriodDistribution, config::stages::StageMap, gui::app::App};
use super::stage_fill;

const CHART_H: f32 = 180.0;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let (Some(raw), Some(view)) = (&app.raw, &app.view) else { return };
    if view.table.series.is_empty() { return; }

    ui.columns(2, |cols| {
        cols[0].strong("Stage distribution per period");
        distribution_chart(&mut cols[0], &view.distribution, raw.stages());
        cols[1].strong("Current stage");
        current_chart(&mut cols[1], &view.current_counts, raw.stages());
    });
}

fn distribution_chart(ui: &mut egui::Ui, dist: &[PeriodDistribution], stages: &StageMap) {
    let width = ui.available_width();
    let (resp, painter) = ui.allocate_painter(vec2(width, CHART_H), Sense::hover());
    let rect = resp.rect;
    let n = dist.len().max(1);
    let max = dist.iter().map(PeriodDistribution::total).max().unwrap_or(0).max(1) as f32;
    let slot = rect.width() / n as f32;
    let bar_w = (slot * 0.8).max(1.0);
    let base = rect.bottom() - 14.0;
    let scale = (base - rect.top() - 4.0) / max;

    painter.line_segment(
        [pos2(rect.left(), base), pos2(rect.right(), base)],
        Stroke::new(1.0, ui.visuals().weak_text_color()),
    );

    for (i, p) in dist.iter().enumerate() {
        let x = rect.left() + i as f32 * slot + (slot - bar_w) / 2.0;
        let mut y = base;
        for (stage, count) in &p.counts {
            let h = *count as f32 * scale;
            let seg = Rect::from_min_max(pos2(x, y - h), pos2(x + bar_w, y));
            painter.rect_filled(seg, 0.0, stage_fill(stages, stage));
            y -= h;
        }
    }

    // first and last period keys under the axis
    let font = FontId::proportional(10.0);
    let weak = ui.visuals().weak_text_color();
    if let Some(first) = dist.first() {
        painter.text(pos2(rect.left(), rect.bottom()), Align2::LEFT_BOTTOM, &first.key, font.clone(), weak);
    }
    if let Some(last) = dist.last().filter(|_| dist.len() > 1) {
        painter.text(pos2(rect.right(), rect.bottom()), Align2::RIGHT_BOTTOM, &last.key, font, weak);
    }

    if let Some(pos) = resp.hover_pos() {
        let i = (((pos.x - rect.left()) / slot) as usize).min(n - 1);
        if let Some(p) = dist.get(i) {
            let mut text = format!("{} ({} deals)", p.key, p.total());
            for (stage, count) in p.counts.iter().rev() {
                text.push_str(&format!("\n{stage}: {count}"));
            }
            resp.on_hover_text_at_pointer(text);
        }
    }
}

fn current_chart(ui: &mut egui::Ui, counts: &[(String, usize)], stages: &StageMap) {
    let row_h = 16.0;
    let width = ui.available_width();
    let height = (counts.len() as f32 * row_h).clamp(row_h, CHART_H);
    egui::ScrollArea::vertical()
        .id_salt("current_stage_chart")
        .max_height(CHART_H)
        .show(ui, |ui| {
            let (resp, painter) =
                ui.allocate_painter(vec2(width, height.max(counts.len() as f32 * row_h)), Sense::hover());
            let rect = resp.rect;
            let label_w = (rect.width() * 0.4).min(200.0);
            let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f32;
            let bar_span = rect.width() - label_w - 40.0;
            let text_color = ui.visuals().text_color();

            for (i, (stage, n)) in counts.iter().enumerate() {
                let top = rect.top() + i as f32 * row_h;
                painter.text(
                    pos2(rect.left() + label_w - 4.0, top + row_h / 2.0),
                    Align2::RIGHT_CENTER,
                    stage,
                    FontId::proportional(11.0),
                    text_color,
                );
                let w = (*n as f32 / max) * bar_span.max(1.0);
                let bar = Rect::from_min_size(pos2(rect.left() + label_w, top + 2.0), vec2(w, row_h - 4.0));
                painter.rect_filled(bar, 2.0, stage_fill(stages, stage));
                painter.rect_stroke(bar, 2.0, Stroke::new(0.5, Color32::from_gray(0x90)), egui::StrokeKind::Inside);
                painter.text(
                    pos2(bar.right() + 4.0, top + row_h / 2.0),
                    Align2::LEFT_CENTER,
                    n.to_string(),
                    FontId::proportional(11.0),
                    text_color,
                );
            }
        });
}
