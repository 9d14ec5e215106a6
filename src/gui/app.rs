// src/gui/app.rs
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use eframe::egui;

use crate::{
    config::{
        consts::PORTAL_ENV,
        options::default_bounds,
        state::{AppState, TableTab},
    },
    core::time::format_date,
    data::{DashboardView, RawData},
    error::{Error, ErrorKind},
};

use super::components;

pub fn run(options: eframe::NativeOptions) -> eframe::Result<()> {
    eframe::run_native(
        "Deal Stage Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // canonical data + the view derived from it
    pub raw: Option<RawData>,
    pub view: Option<DashboardView>,
    pub view_dirty: bool,

    pub today: NaiveDate,
    pub portal_id: Option<String>,

    // text fields we map <-> options on commit
    pub start_text: String,
    pub end_text: String,
    pub created_from_text: String,
    pub created_to_text: String,
    pub out_dir_text: String,
    pub out_dir_dirty: bool,

    // status line (progress sinks write here) and blocking error panel
    pub status: Arc<Mutex<String>>,
    pub error: Option<String>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let out_dir_text = state.options.export.out_dir.to_string_lossy().into_owned();
        let portal_id = std::env::var(PORTAL_ENV).ok().filter(|s| !s.trim().is_empty());

        let mut app = Self {
            state,
            raw: None,
            view: None,
            view_dirty: false,
            today: Utc::now().date_naive(),
            portal_id,
            start_text: s!(),
            end_text: s!(),
            created_from_text: s!(),
            created_to_text: s!(),
            out_dir_text,
            out_dir_dirty: false,
            status: Arc::new(Mutex::new(s!("Idle"))),
            error: None,
        };
        app.reload();
        logf!("Init: portal link {}", if app.portal_id.is_some() { "on" } else { "off" });
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    #[inline]
    pub fn tab(&self) -> TableTab { self.state.gui.tab }

    /// Show an error: configuration problems block, the rest go to the status line.
    pub fn report(&mut self, context: &str, e: &Error) {
        loge!("{context}: {e}");
        match e.kind() {
            ErrorKind::Configuration => self.error = Some(format!("{context}: {e}")),
            ErrorKind::Upstream | ErrorKind::Io => self.status(format!("{context} failed: {e}")),
        }
    }

    /// (Re)load the newest deals file and reset the analysis window to the data.
    pub fn reload(&mut self) {
        match RawData::load(&self.state.options) {
            Ok(raw) => {
                let (lo, hi) = default_bounds(raw.deals(), self.today);
                let analysis = &mut self.state.options.analysis;
                analysis.start = Some(lo);
                analysis.end = Some(hi);
                analysis.periods = None;
                self.start_text = format_date(&lo);
                self.end_text = format_date(&hi);

                let n = raw.deals().len();
                let w = raw.warnings().len();
                self.status(format!("Loaded {n} deals ({w} warning(s))"));
                self.raw = Some(raw);
                self.view_dirty = true;
            }
            Err(e @ Error::NoInput(_)) => {
                logd!("Load: {e}");
                self.raw = None;
                self.view = None;
                self.status("No deals file yet. Press Refresh to extract from HubSpot.");
            }
            Err(e) => {
                self.raw = None;
                self.view = None;
                self.report("Load", &e);
            }
        }
    }

    /// Rebuild the dashboard view after any option change.
    pub fn rebuild_view(&mut self) {
        self.view_dirty = false;
        let Some(raw) = &self.raw else {
            self.view = None;
            return;
        };
        match DashboardView::build(raw, &self.state.options, self.today) {
            Ok(v) => self.view = Some(v),
            Err(e) => {
                self.view = None;
                self.status(format!("Invalid analysis window: {e}"));
            }
        }
    }

    pub fn mark_dirty(&mut self) {
        self.view_dirty = true;
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.view_dirty {
            self.rebuild_view();
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            components::top_bar::draw(ui, self);
            ui.separator();
            components::analysis_bar::draw(ui, self);
        });

        egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    components::filter_panel::draw(ui, self);
                });
            });

        egui::TopBottomPanel::bottom("export").show(ctx, |ui| {
            components::export_bar::draw(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::metrics::draw(ui, self);
            ui.separator();

            if self.state.gui.show_charts {
                components::charts::draw(ui, self);
                ui.separator();
            }
            if self.state.gui.show_legend {
                components::legend::draw(ui, self);
                ui.separator();
            }

            components::tabs::draw(ui, self);
            ui.separator();

            match self.tab() {
                TableTab::Matrix => components::matrix_table::draw(ui, self),
                TableTab::Changes => components::changes_table::draw(ui, self),
                TableTab::Stagnant => components::stagnant_table::draw(ui, self),
                TableTab::Warnings => components::warnings::draw(ui, self),
            }
        });

        components::error_panel::draw(ctx, self);
    }
}
