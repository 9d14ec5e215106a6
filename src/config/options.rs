// src/config/options.rs
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::consts::*;
use crate::core::{AnalysisRange, Granularity};
use crate::error::Result;
use crate::filter::DealFilter;
use crate::model::Deal;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppOptions {
    pub analysis: AnalysisOptions,
    pub filter: DealFilter,
    pub export: ExportOptions,
    pub paths: PathOptions,
}

/// Requested analysis window. Unset bounds are derived from the data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub granularity: Granularity,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// When set, overrides `end` with exactly this many periods from `start`.
    pub periods: Option<usize>,
}

impl AnalysisOptions {
    /// Resolve to a concrete range.
    ///
    /// Defaults: start = earliest creation date, end = the latest creation
    /// date capped at `today`. With no deals both default to `today`.
    pub fn resolve(&self, deals: &[Deal], today: NaiveDate) -> Result<AnalysisRange> {
        let (lo, hi) = default_bounds(deals, today);
        let start = self.start.unwrap_or(lo);
        match self.periods {
            Some(n) => AnalysisRange::with_periods(start, self.granularity, n),
            None => AnalysisRange::new(start, self.end.unwrap_or(hi), self.granularity),
        }
    }
}

pub fn default_bounds(deals: &[Deal], today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let min = deals.iter().map(Deal::created_date).min();
    let max = deals.iter().map(Deal::created_date).max();
    match (min, max) {
        (Some(lo), Some(hi)) => {
            let hi = hi.min(today);
            (lo.min(hi), hi)
        }
        _ => (today, today),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Tsv];

    pub fn ext(self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delimiter(self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
    pub fn label(self) -> &'static str {
        match self { ExportFormat::Csv => "CSV", ExportFormat::Tsv => "TSV" }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(format!("unknown format '{other}' (expected csv or tsv)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    pub out_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl ExportOptions {
    /// `<out_dir>/<stem>.<ext>`
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.out_dir.join(join!(stem, ".", self.format.ext()))
    }

    /// Parse GUI text into the output directory.
    pub fn set_dir(&mut self, text: &str) {
        let s = text.trim();
        self.out_dir = if s.is_empty() {
            PathBuf::from(DEFAULT_OUT_DIR)
        } else {
            PathBuf::from(crate::file::normalize_separators(s))
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathOptions {
    pub data_dir: PathBuf,
    /// Explicit deals file; otherwise the latest extract in `data_dir`.
    pub input: Option<PathBuf>,
    /// Explicit stage map; otherwise `stages.toml` if present, else built-in.
    pub stage_map: Option<PathBuf>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            input: None,
            stage_map: None,
        }
    }
}

impl PathOptions {
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }
    pub fn stage_map(&self) -> Option<&Path> {
        self.stage_map.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_bounds_cap_at_today() {
        let deals = vec![
            Deal::new("1", "a", chrono::Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap()),
            Deal::new("2", "b", chrono::Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
        ];
        assert_eq!(default_bounds(&deals, d(2025, 3, 1)), (d(2025, 1, 5), d(2025, 3, 1)));
        assert_eq!(default_bounds(&[], d(2025, 3, 1)), (d(2025, 3, 1), d(2025, 3, 1)));
    }

    #[test]
    fn export_path_uses_format_extension() {
        let mut e = ExportOptions::default();
        e.format = ExportFormat::Tsv;
        assert_eq!(e.path_for("snapshots"), PathBuf::from("out").join("snapshots.tsv"));
        assert_eq!("TSV".parse::<ExportFormat>(), Ok(ExportFormat::Tsv));
    }
}
