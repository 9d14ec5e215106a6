// src/data.rs
//
// Canonical and view-layer data for the dashboard.
//
// - RawData: the loaded deals plus the stage map they were read with.
//            Replaced wholesale on load/refresh; never edited in place.
// - DashboardView: everything one frame of the dashboard shows, derived
//                  from RawData by the current options.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDate;

use crate::analysis::{self, Metrics, PeriodDistribution, StagnantDeal};
use crate::config::options::AppOptions;
use crate::config::stages::StageMap;
use crate::core::AnalysisRange;
use crate::error::Result;
use crate::ingest::{load_deals, DataWarning, LoadedDeals};
use crate::model::{Deal, StageChange};
use crate::snapshot::SnapshotTable;

/// Authoritative deal set for one input file.
#[derive(Clone, Debug)]
pub struct RawData {
    loaded: LoadedDeals,
    stages: StageMap,
}

impl RawData {
    pub fn new(loaded: LoadedDeals, stages: StageMap) -> Self {
        Self { loaded, stages }
    }

    /// Resolve the input per `options.paths` and load it.
    pub fn load(options: &AppOptions) -> Result<Self> {
        let stages = StageMap::resolve(options.paths.stage_map())?;
        let path = crate::store::resolve_input(options.paths.input(), &options.paths.data_dir)?;
        let loaded = load_deals(&path, &stages)?;
        Ok(Self { loaded, stages })
    }

    pub fn deals(&self) -> &[Deal] { &self.loaded.deals }
    pub fn stages(&self) -> &StageMap { &self.stages }
    pub fn warnings(&self) -> &[DataWarning] { &self.loaded.warnings }
    pub fn source(&self) -> Option<&Path> { self.loaded.source.as_deref() }
    pub fn modified(&self) -> Option<SystemTime> { self.loaded.modified }
    pub fn rows_read(&self) -> usize { self.loaded.rows_read }
    pub fn skipped(&self) -> usize { self.loaded.skipped() }

    pub fn source_owned(&self) -> Option<PathBuf> {
        self.loaded.source.clone()
    }
}

/// Filtered, analysed projection of RawData.
#[derive(Clone, Debug)]
pub struct DashboardView {
    pub range: AnalysisRange,
    /// Deals surviving the deal-level filters.
    pub prefiltered: usize,
    pub table: SnapshotTable,
    pub changes: Vec<StageChange>,
    pub metrics: Metrics,
    /// Every deal with a known stage, longest-stagnant first.
    pub stagnant: Vec<StagnantDeal>,
    pub distribution: Vec<PeriodDistribution>,
    pub current_counts: Vec<(String, usize)>,
}

impl DashboardView {
    /// Pre-snapshot filters, snapshot build, post-snapshot filters, then
    /// metrics over what is left.
    pub fn build(raw: &RawData, options: &AppOptions, today: NaiveDate) -> Result<Self> {
        let filter = &options.filter;
        let range = options.analysis.resolve(raw.deals(), today)?;

        let kept: Vec<&Deal> = raw.deals().iter().filter(|d| filter.accepts_deal(d)).collect();
        let prefiltered = kept.len();

        let mut table = SnapshotTable::build_from(kept, &range);
        filter.apply_to_table(&mut table);

        let mut stagnant = analysis::stagnant_deals(&table);
        stagnant.sort_by(|a, b| b.stagnant_periods.cmp(&a.stagnant_periods));

        logd!(
            "View: {} | filters: {} | deals {} → {} | periods {}",
            range.describe(),
            filter.describe(),
            prefiltered,
            table.series.len(),
            table.periods.len()
        );

        Ok(Self {
            range,
            prefiltered,
            changes: table.changes(),
            metrics: Metrics::of(&table),
            stagnant,
            distribution: analysis::stage_distribution(&table, raw.stages()),
            current_counts: analysis::current_stage_counts(&table, raw.stages()),
            table,
        })
    }

    /// Stagnant deals over the filter threshold.
    pub fn stagnant_over(&self, threshold: usize) -> impl Iterator<Item = &StagnantDeal> {
        self.stagnant.iter().filter(move |d| d.stagnant_periods > threshold)
    }
}
