// src/filter.rs
//
// Dashboard filters. Deal-level filters run before snapshot generation,
// stage filters run on the finished table. "Show all" bypasses every filter
// except the stagnant one.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::analysis::stagnation;
use crate::config::consts::{DEFAULT_STAGNANT_THRESHOLD, MAX_STAGNANT_THRESHOLD};
use crate::core::Granularity;
use crate::model::Deal;
use crate::snapshot::{DealSeries, SnapshotTable};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealFilter {
    pub show_all: bool,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    /// Case-insensitive substring of the deal name.
    pub name_query: String,
    /// Explicit deal-name picks; empty = any.
    pub names: BTreeSet<String>,
    /// Campaign picks; empty = any.
    pub campaigns: BTreeSet<String>,
    /// Keep only deals whose current stage is listed; empty = any.
    pub include_stages: BTreeSet<String>,
    /// Drop deals whose current stage is listed.
    pub exclude_stages: BTreeSet<String>,
    pub stagnant_only: bool,
    pub stagnant_threshold: usize,
}

impl Default for DealFilter {
    fn default() -> Self {
        Self {
            show_all: false,
            created_from: None,
            created_to: None,
            name_query: s!(),
            names: BTreeSet::new(),
            campaigns: BTreeSet::new(),
            include_stages: BTreeSet::new(),
            exclude_stages: BTreeSet::new(),
            stagnant_only: false,
            stagnant_threshold: DEFAULT_STAGNANT_THRESHOLD,
        }
    }
}

impl DealFilter {
    pub fn set_threshold(&mut self, n: usize) {
        self.stagnant_threshold = n.clamp(1, MAX_STAGNANT_THRESHOLD);
    }

    /// Deal-level checks applied before snapshots are built.
    pub fn accepts_deal(&self, deal: &Deal) -> bool {
        if self.show_all {
            return true;
        }
        let created = deal.created_date();
        if self.created_from.is_some_and(|from| created < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| created > to) {
            return false;
        }
        let q = self.name_query.trim();
        if !q.is_empty() && !deal.name.to_lowercase().contains(&q.to_lowercase()) {
            return false;
        }
        if !self.names.is_empty() && !self.names.contains(&deal.name) {
            return false;
        }
        if !self.campaigns.is_empty() && !self.campaigns.contains(&deal.campaign) {
            return false;
        }
        true
    }

    /// Series-level checks applied to the finished table.
    pub fn accepts_series(&self, series: &DealSeries) -> bool {
        if !self.show_all {
            let current = series.current_stage().unwrap_or("");
            if !self.include_stages.is_empty() && !self.include_stages.contains(current) {
                return false;
            }
            if self.exclude_stages.contains(current) {
                return false;
            }
        }
        if self.stagnant_only {
            return stagnation(series)
                .is_some_and(|s| s.stagnant_periods > self.stagnant_threshold);
        }
        true
    }

    pub fn apply_to_table(&self, table: &mut SnapshotTable) {
        table.retain(|s| self.accepts_series(s));
    }

    /// Human-readable list of active filters for status lines.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.show_all {
            parts.push(s!("show all"));
        } else {
            if let Some(from) = self.created_from { parts.push(format!("created ≥ {from}")); }
            if let Some(to) = self.created_to { parts.push(format!("created ≤ {to}")); }
            if !self.name_query.trim().is_empty() { parts.push(format!("name ~ '{}'", self.name_query.trim())); }
            if !self.names.is_empty() { parts.push(format!("{} deal(s)", self.names.len())); }
            if !self.campaigns.is_empty() { parts.push(format!("{} campaign(s)", self.campaigns.len())); }
            if !self.include_stages.is_empty() { parts.push(format!("{} stage(s) in", self.include_stages.len())); }
            if !self.exclude_stages.is_empty() { parts.push(format!("{} stage(s) out", self.exclude_stages.len())); }
        }
        if self.stagnant_only {
            parts.push(format!("stagnant > {}", self.stagnant_threshold));
        }
        if parts.is_empty() { s!("none") } else { parts.join(", ") }
    }
}

/// Preset analysis windows ending today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickRange {
    Days30,
    Days60,
    Weeks13,
    Weeks54,
    Months12,
    Months24,
}

impl QuickRange {
    pub const ALL: [QuickRange; 6] = [
        QuickRange::Days30, QuickRange::Days60,
        QuickRange::Weeks13, QuickRange::Weeks54,
        QuickRange::Months12, QuickRange::Months24,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickRange::Days30 => "Last 30 Days",
            QuickRange::Days60 => "Last 60 Days",
            QuickRange::Weeks13 => "Last 13 Weeks",
            QuickRange::Weeks54 => "Last 54 Weeks",
            QuickRange::Months12 => "Last 12 Months",
            QuickRange::Months24 => "Last 24 Months",
        }
    }

    pub fn granularity(self) -> Granularity {
        match self {
            QuickRange::Days30 | QuickRange::Days60 => Granularity::Daily,
            QuickRange::Weeks13 | QuickRange::Weeks54 => Granularity::Weekly,
            QuickRange::Months12 | QuickRange::Months24 => Granularity::Monthly,
        }
    }

    /// `(start, end)` covering exactly N buckets up to and including today.
    pub fn apply(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            QuickRange::Days30 => today - Days::new(29),
            QuickRange::Days60 => today - Days::new(59),
            QuickRange::Weeks13 => today - Days::new(12 * 7),
            QuickRange::Weeks54 => today - Days::new(53 * 7),
            QuickRange::Months12 => month_start(today) - Months::new(11),
            QuickRange::Months24 => month_start(today) - Months::new(23),
        };
        (start, today)
    }
}

/// Creation-date presets for the filter sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreationQuick {
    Months3,
    Months6,
    AllTime,
}

impl CreationQuick {
    pub const ALL: [CreationQuick; 3] = [CreationQuick::Months3, CreationQuick::Months6, CreationQuick::AllTime];

    pub fn label(self) -> &'static str {
        match self {
            CreationQuick::Months3 => "Last 3 Months",
            CreationQuick::Months6 => "Last 6 Months",
            CreationQuick::AllTime => "All Time",
        }
    }

    /// Month presets start on the first of the month N months back.
    /// "All time" clears both bounds.
    pub fn apply(self, filter: &mut DealFilter, today: NaiveDate) {
        let back = match self {
            CreationQuick::Months3 => 3,
            CreationQuick::Months6 => 6,
            CreationQuick::AllTime => {
                filter.created_from = None;
                filter.created_to = None;
                return;
            }
        };
        filter.created_from = Some(month_start(today) - Months::new(back));
        filter.created_to = Some(today);
    }
}

fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Distinct non-blank campaigns, sorted.
pub fn campaign_options(deals: &[Deal]) -> Vec<String> {
    let set: BTreeSet<&str> = deals
        .iter()
        .map(|d| d.campaign.trim())
        .filter(|c| !c.is_empty())
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Distinct deal names, sorted.
pub fn name_options(deals: &[Deal]) -> Vec<String> {
    let set: BTreeSet<&str> = deals.iter().map(|d| d.name.as_str()).collect();
    set.into_iter().map(String::from).collect()
}
