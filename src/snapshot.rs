// src/snapshot.rs
//
// Period snapshots: for every deal and every period from the deal's
// creation period (clamped to the range start) to the range end, the stage
// held as of the period's end. Unobserved periods carry the last known stage
// forward; nothing is interpolated.

use chrono::{DateTime, Utc};

use crate::core::{AnalysisRange, Period};
use crate::core::time::{format_date, format_timestamp};
use crate::model::{Deal, PeriodSnapshot, StageChange, StageEntry};
use crate::store::DataSet;

pub const SNAPSHOT_HEADERS: [&str; 6] =
    ["deal_id", "deal_name", "period_start", "period_end", "stage", "stage_entered_at"];

pub const CHANGE_HEADERS: [&str; 7] = [
    "deal_id", "deal_name", "period_start", "period_end",
    "previous_stage", "current_stage", "changed_at",
];

/// One cell of a deal's series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub stage: Option<String>,
    pub entered_at: Option<DateTime<Utc>>,
}

impl Cell {
    fn from_entry(e: Option<&StageEntry>) -> Self {
        Self {
            stage: e.map(|e| e.stage.clone()),
            entered_at: e.map(|e| e.entered_at),
        }
    }
}

/// A deal's contiguous run of cells; `cells[k]` belongs to
/// `periods[first + k]` of the owning table.
#[derive(Clone, Debug, PartialEq)]
pub struct DealSeries {
    pub deal_id: String,
    pub deal_name: String,
    pub created_at: DateTime<Utc>,
    pub campaign: String,
    /// Last contact's full name.
    pub contact: String,
    pub amount: Option<f64>,
    pub first: usize,
    pub cells: Vec<Cell>,
}

impl DealSeries {
    /// Last stage seen inside the window ("current stage").
    pub fn current_stage(&self) -> Option<&str> {
        self.cells.iter().rev().find_map(|c| c.stage.as_deref())
    }

    /// Number of adjacent-cell differences.
    pub fn change_count(&self) -> usize {
        self.cells.windows(2).filter(|w| w[0].stage != w[1].stage).count()
    }

    /// Cell for table period `ix`, if the deal existed then.
    pub fn cell_at(&self, ix: usize) -> Option<&Cell> {
        ix.checked_sub(self.first).and_then(|k| self.cells.get(k))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotTable {
    pub range: AnalysisRange,
    pub periods: Vec<Period>,
    pub series: Vec<DealSeries>,
}

impl SnapshotTable {
    pub fn build(deals: &[Deal], range: &AnalysisRange) -> Self {
        Self::build_from(deals.iter(), range)
    }

    /// Build from any deal iterator (filtered views pass references).
    pub fn build_from<'a, I>(deals: I, range: &AnalysisRange) -> Self
    where
        I: IntoIterator<Item = &'a Deal>,
    {
        let periods = range.periods();
        let ends: Vec<DateTime<Utc>> = periods.iter().map(|p| p.end_instant()).collect();

        let mut series = Vec::new();
        for deal in deals {
            // first period that ends after creation
            let first = ends.partition_point(|end| *end <= deal.created_at);
            if first >= periods.len() {
                continue; // created after the window
            }
            let cells = ends[first..]
                .iter()
                .map(|end| Cell::from_entry(deal.stage_as_of(*end)))
                .collect();
            series.push(DealSeries {
                deal_id: deal.id.clone(),
                deal_name: deal.name.clone(),
                created_at: deal.created_at,
                campaign: deal.campaign.clone(),
                contact: deal.contact.clone(),
                amount: deal.amount,
                first,
                cells,
            });
        }

        Self { range: *range, periods, series }
    }

    /// Keep only series matching `keep`.
    pub fn retain<F: FnMut(&DealSeries) -> bool>(&mut self, keep: F) {
        self.series.retain(keep);
    }

    pub fn snapshot_count(&self) -> usize {
        self.series.iter().map(|s| s.cells.len()).sum()
    }

    pub fn snapshots(&self) -> Vec<PeriodSnapshot> {
        let mut out = Vec::with_capacity(self.snapshot_count());
        for s in &self.series {
            for (k, cell) in s.cells.iter().enumerate() {
                out.push(PeriodSnapshot {
                    deal_id: s.deal_id.clone(),
                    deal_name: s.deal_name.clone(),
                    period: self.periods[s.first + k],
                    stage: cell.stage.clone(),
                    stage_entered_at: cell.entered_at,
                });
            }
        }
        out
    }

    pub fn changes(&self) -> Vec<StageChange> {
        let mut out = Vec::new();
        for s in &self.series {
            for (k, w) in s.cells.windows(2).enumerate() {
                let (prev, cur) = (&w[0], &w[1]);
                if prev.stage == cur.stage {
                    continue;
                }
                out.push(StageChange {
                    deal_id: s.deal_id.clone(),
                    deal_name: s.deal_name.clone(),
                    period: self.periods[s.first + k + 1],
                    previous_stage: prev.stage.clone(),
                    current_stage: cur.stage.clone(),
                    changed_at: cur.entered_at,
                });
            }
        }
        out
    }

    /// Flat snapshot rows in output-file layout.
    pub fn snapshots_dataset(&self) -> DataSet {
        let rows = self
            .snapshots()
            .iter()
            .map(|s| vec![
                s.deal_id.clone(),
                s.deal_name.clone(),
                format_date(&s.period.start),
                format_date(&s.period.last_day()),
                s.stage.clone().unwrap_or_default(),
                s.stage_entered_at.as_ref().map(format_timestamp).unwrap_or_default(),
            ])
            .collect();
        DataSet::with_headers(&SNAPSHOT_HEADERS, rows)
    }

    pub fn changes_dataset(&self) -> DataSet {
        let rows = self
            .changes()
            .iter()
            .map(|c| vec![
                c.deal_id.clone(),
                c.deal_name.clone(),
                format_date(&c.period.start),
                format_date(&c.period.last_day()),
                c.previous_stage.clone().unwrap_or_default(),
                c.current_stage.clone().unwrap_or_default(),
                c.changed_at.as_ref().map(format_timestamp).unwrap_or_default(),
            ])
            .collect();
        DataSet::with_headers(&CHANGE_HEADERS, rows)
    }

    /// Wide deal × period matrix as shown in the dashboard.
    /// Cells before a deal's creation and creation-only cells are blank.
    pub fn matrix_dataset(&self) -> DataSet {
        let g = self.range.granularity;
        let mut headers = row!["Deal Name", "Deal ID", "Created", "Lemlist Campaign"];
        headers.extend(self.periods.iter().map(|p| g.key(p.start)));

        let rows = self
            .series
            .iter()
            .map(|s| {
                let mut r = vec![
                    s.deal_name.clone(),
                    s.deal_id.clone(),
                    format_date(&s.created_at.date_naive()),
                    s.campaign.clone(),
                ];
                r.extend((0..self.periods.len()).map(|ix| {
                    s.cell_at(ix).and_then(|c| c.stage.clone()).unwrap_or_default()
                }));
                r
            })
            .collect();
        DataSet { headers: Some(headers), rows }
    }
}
