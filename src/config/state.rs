// src/config/state.rs
use super::options::AppOptions;

/// Which table the central panel shows (and Copy/Export act on).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TableTab {
    #[default]
    Matrix,
    Changes,
    Stagnant,
    Warnings,
}

impl TableTab {
    pub const ALL: [TableTab; 4] = [TableTab::Matrix, TableTab::Changes, TableTab::Stagnant, TableTab::Warnings];

    pub fn label(self) -> &'static str {
        match self {
            TableTab::Matrix => "Stage Matrix",
            TableTab::Changes => "Stage Changes",
            TableTab::Stagnant => "Stagnant Deals",
            TableTab::Warnings => "Data Warnings",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GuiState {
    pub tab: TableTab,

    pub window_w: u32,
    pub window_h: u32,

    pub show_charts: bool,
    pub show_legend: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            tab: TableTab::Matrix,
            window_w: 1400,
            window_h: 900,
            show_charts: true,
            show_legend: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
