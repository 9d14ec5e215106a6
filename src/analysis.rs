// src/analysis.rs
//
// Figures derived from a snapshot table: stagnation, headline metrics,
// per-period stage distribution and the exportable JSON summary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::stages::StageMap;
use crate::core::{AnalysisRange, Granularity};
use crate::snapshot::{DealSeries, SnapshotTable};
use crate::store::DataSet;

pub const STAGNANT_HEADERS: [&str; 5] =
    ["deal_id", "deal_name", "current_stage", "stagnant_periods", "total_periods"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StagnantDeal {
    pub deal_id: String,
    pub deal_name: String,
    pub current_stage: String,
    /// Trailing known-stage periods equal to `current_stage`.
    pub stagnant_periods: usize,
    /// Periods with a known stage.
    pub total_periods: usize,
}

/// `None` for deals that never entered a tracked stage inside the window.
pub fn stagnation(series: &DealSeries) -> Option<StagnantDeal> {
    let known: Vec<&str> = series.cells.iter().filter_map(|c| c.stage.as_deref()).collect();
    let current = *known.last()?;
    let trailing = known.iter().rev().take_while(|s| **s == current).count();
    Some(StagnantDeal {
        deal_id: series.deal_id.clone(),
        deal_name: series.deal_name.clone(),
        current_stage: s!(current),
        stagnant_periods: trailing,
        total_periods: known.len(),
    })
}

pub fn stagnant_deals(table: &SnapshotTable) -> Vec<StagnantDeal> {
    table.series.iter().filter_map(stagnation).collect()
}

/// Deals stagnant for strictly more than `threshold` periods, longest first.
pub fn stagnant_over(table: &SnapshotTable, threshold: usize) -> Vec<StagnantDeal> {
    let mut v: Vec<_> = stagnant_deals(table)
        .into_iter()
        .filter(|d| d.stagnant_periods > threshold)
        .collect();
    v.sort_by(|a, b| b.stagnant_periods.cmp(&a.stagnant_periods));
    v
}

pub fn stagnant_dataset(deals: &[StagnantDeal]) -> DataSet {
    let rows = deals
        .iter()
        .map(|d| vec![
            d.deal_id.clone(),
            d.deal_name.clone(),
            d.current_stage.clone(),
            d.stagnant_periods.to_string(),
            d.total_periods.to_string(),
        ])
        .collect();
    DataSet::with_headers(&STAGNANT_HEADERS, rows)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub deals: usize,
    pub periods: usize,
    pub deals_with_changes: usize,
    pub stage_changes: usize,
    pub snapshot_rows: usize,
    /// Sum of deal amounts; deals without one count as zero.
    pub pipeline_amount: f64,
}

impl Metrics {
    pub fn of(table: &SnapshotTable) -> Self {
        let per_deal: Vec<usize> = table.series.iter().map(DealSeries::change_count).collect();
        Self {
            deals: table.series.len(),
            periods: table.periods.len(),
            deals_with_changes: per_deal.iter().filter(|n| **n > 0).count(),
            stage_changes: per_deal.iter().sum(),
            snapshot_rows: table.snapshot_count(),
            pipeline_amount: table.series.iter().filter_map(|s| s.amount).sum(),
        }
    }
}

/// Stage → count for one period, in stage-map order (unknown stages last).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PeriodDistribution {
    pub key: String,
    pub counts: Vec<(String, usize)>,
}

impl PeriodDistribution {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

fn ordered_counts(counts: BTreeMap<&str, usize>, stages: &StageMap) -> Vec<(String, usize)> {
    let mut v: Vec<(String, usize)> = counts.into_iter().map(|(k, n)| (s!(k), n)).collect();
    // stable: alphabetical within the same rank
    v.sort_by_key(|(k, _)| stages.rank(k));
    v
}

/// Known-stage counts per period. Deals without a stage yet are not counted.
pub fn stage_distribution(table: &SnapshotTable, stages: &StageMap) -> Vec<PeriodDistribution> {
    let g = table.range.granularity;
    table
        .periods
        .iter()
        .enumerate()
        .map(|(ix, p)| {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for s in &table.series {
                if let Some(stage) = s.cell_at(ix).and_then(|c| c.stage.as_deref()) {
                    *counts.entry(stage).or_default() += 1;
                }
            }
            PeriodDistribution { key: g.key(p.start), counts: ordered_counts(counts, stages) }
        })
        .collect()
}

/// Deals per current stage, in stage-map order.
pub fn current_stage_counts(table: &SnapshotTable, stages: &StageMap) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for s in &table.series {
        if let Some(stage) = s.current_stage() {
            *counts.entry(stage).or_default() += 1;
        }
    }
    ordered_counts(counts, stages)
}

/// Everything `summary.json` carries. No wall-clock fields, so reruns on the
/// same input serialize identically.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub source: Option<PathBuf>,
    pub range: AnalysisRange,
    pub granularity: Granularity,
    pub metrics: Metrics,
    pub current_stages: BTreeMap<String, usize>,
    pub stagnant_threshold: usize,
    pub stagnant: Vec<StagnantDeal>,
    pub warnings: usize,
}

impl Summary {
    pub fn build(
        table: &SnapshotTable,
        stages: &StageMap,
        stagnant_threshold: usize,
        source: Option<PathBuf>,
        warnings: usize,
    ) -> Self {
        Self {
            source,
            range: table.range,
            granularity: table.range.granularity,
            metrics: Metrics::of(table),
            current_stages: current_stage_counts(table, stages).into_iter().collect(),
            stagnant_threshold,
            stagnant: stagnant_over(table, stagnant_threshold),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Cell;
    use chrono::{TimeZone, Utc};

    fn series(stages: &[Option<&str>]) -> DealSeries {
        DealSeries {
            deal_id: s!("1"),
            deal_name: s!("Acme"),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            campaign: s!(),
            contact: s!(),
            amount: None,
            first: 0,
            cells: stages
                .iter()
                .map(|s| Cell { stage: s.map(String::from), entered_at: None })
                .collect(),
        }
    }

    #[test]
    fn trailing_run_counts_known_periods_only() {
        let s = series(&[None, Some("Demo Booked"), Some("Demo Done"), Some("Demo Done"), Some("Demo Done")]);
        let st = stagnation(&s).unwrap();
        assert_eq!(st.current_stage, "Demo Done");
        assert_eq!(st.stagnant_periods, 3);
        assert_eq!(st.total_periods, 4);
    }

    #[test]
    fn never_staged_is_not_stagnant() {
        assert_eq!(stagnation(&series(&[None, None])), None);
    }
}
