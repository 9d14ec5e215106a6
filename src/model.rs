// src/model.rs
//
// Row types shared by ingestion, snapshot generation and the frontends.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::core::Period;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageEntry {
    pub stage: String,
    pub entered_at: DateTime<Utc>,
}

/// One deal as read from the extract. `history` is sorted by `entered_at`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub history: Vec<StageEntry>,
    pub contact: String,
    pub campaign: String,
    pub amount: Option<f64>,
}

impl Deal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            history: Vec::new(),
            contact: s!(),
            campaign: s!(),
            amount: None,
        }
    }

    /// Builder used by tests and the bench; keeps `history` sorted.
    pub fn with_stage(mut self, stage: impl Into<String>, entered_at: DateTime<Utc>) -> Self {
        self.history.push(StageEntry { stage: stage.into(), entered_at });
        self.history.sort_by_key(|e| e.entered_at);
        self
    }

    pub fn created_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Latest stage entered strictly before `instant`.
    pub fn stage_as_of(&self, instant: DateTime<Utc>) -> Option<&StageEntry> {
        // history is sorted; find the last entry < instant
        let n = self.history.partition_point(|e| e.entered_at < instant);
        n.checked_sub(1).map(|i| &self.history[i])
    }
}

/// Stage occupied by one deal during one period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PeriodSnapshot {
    pub deal_id: String,
    pub deal_name: String,
    pub period: Period,
    /// `None` while the deal exists but has not entered any tracked stage.
    pub stage: Option<String>,
    pub stage_entered_at: Option<DateTime<Utc>>,
}

/// A difference between two adjacent snapshots of the same deal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageChange {
    pub deal_id: String,
    pub deal_name: String,
    pub period: Period,
    pub previous_stage: Option<String>,
    pub current_stage: Option<String>,
    pub changed_at: Option<DateTime<Utc>>,
}
