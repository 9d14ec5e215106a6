// src/ingest.rs
//
// Deals file → `Vec<Deal>`. Bad cells and rows never fail the run: they are
// dropped and recorded as warnings. Only structural problems (no file, no
// required column) are errors.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::consts::*;
use crate::config::stages::StageMap;
use crate::core::time::parse_timestamp;
use crate::csv::{parse_rows, sniff_delimiter, HeaderIndex};
use crate::error::{Error, Result};
use crate::model::{Deal, StageEntry};

const REQUIRED: [&str; 3] = [COL_DEAL_ID, COL_NAME, COL_CREATED];

/// A data-quality problem that cost a cell or a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataWarning {
    /// 1-based line in the source file; 1 is the header.
    pub line: usize,
    pub deal_id: String,
    pub message: String,
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deal_id.is_empty() {
            write!(f, "line {}: {}", self.line, self.message)
        } else {
            write!(f, "line {} (deal {}): {}", self.line, self.deal_id, self.message)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadedDeals {
    pub deals: Vec<Deal>,
    pub warnings: Vec<DataWarning>,
    pub rows_read: usize,
    pub source: Option<PathBuf>,
    pub modified: Option<SystemTime>,
}

impl LoadedDeals {
    pub fn skipped(&self) -> usize {
        self.rows_read.saturating_sub(self.deals.len())
    }
}

/// Read and parse a deals file from disk.
pub fn load_deals(path: &Path, stages: &StageMap) -> Result<LoadedDeals> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let mut loaded = parse_deals(&text, stages, path)?;
    loaded.source = Some(path.to_path_buf());
    loaded.modified = fs::metadata(path).ok().and_then(|m| m.modified().ok());
    logf!(
        "Ingest: {} → deals={} skipped={} warnings={}",
        path.display(),
        loaded.deals.len(),
        loaded.skipped(),
        loaded.warnings.len()
    );
    Ok(loaded)
}

/// Parse deals file contents. `origin` only labels errors.
pub fn parse_deals(text: &str, stages: &StageMap, origin: &Path) -> Result<LoadedDeals> {
    let sep = sniff_delimiter(text);
    let mut rows = parse_rows(text, sep).into_iter();

    let header = rows.next().unwrap_or_default();
    let hx = HeaderIndex::new(&header);
    for col in REQUIRED {
        if hx.get(col).is_none() {
            return Err(Error::MissingColumn { path: origin.to_path_buf(), column: s!(col) });
        }
    }

    let mut out = LoadedDeals::default();
    let mut warn = |line: usize, deal_id: &str, message: String| {
        logw!("Ingest: line {line} deal '{deal_id}': {message}");
        out.warnings.push(DataWarning { line, deal_id: s!(deal_id), message });
    };

    // Mapped stages whose column is missing from the file
    let mut stage_cols: Vec<(usize, &str, &str)> = Vec::with_capacity(stages.len());
    for st in stages.stages() {
        match hx.get(&st.field) {
            Some(ix) => stage_cols.push((ix, st.field.as_str(), st.name.as_str())),
            None => warn(1, "", format!("stage field `{}` ({}) not in file", st.field, st.name)),
        }
    }

    let mut deals = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows_read = 0usize;

    for (i, row) in rows.enumerate() {
        let line = i + 2;
        rows_read += 1;

        let id = hx.cell(&row, COL_DEAL_ID).trim();
        if id.is_empty() {
            warn(line, "", s!("blank deal id; row skipped"));
            continue;
        }
        // an id is taken only once its row has been accepted
        if seen.contains(id) {
            warn(line, id, s!("duplicate deal id; row skipped"));
            continue;
        }

        // Stage history (bad cells dropped)
        let mut history = Vec::new();
        for &(ix, field, name) in &stage_cols {
            let raw = row.get(ix).map(|s| s.as_str()).unwrap_or("");
            match parse_timestamp(raw) {
                Ok(Some(entered_at)) => history.push(StageEntry { stage: s!(name), entered_at }),
                Ok(None) => {}
                Err(e) => warn(line, id, format!("{field}: {e}; stage entry dropped")),
            }
        }
        // stable: mapping order breaks ties
        history.sort_by_key(|e| e.entered_at);

        let created_raw = hx.cell(&row, COL_CREATED);
        let created_at = match parse_timestamp(created_raw) {
            Ok(Some(t)) => t,
            other => {
                let why = match other {
                    Err(e) => e.to_string(),
                    _ => s!("missing creation timestamp"),
                };
                match history.first() {
                    Some(first) => {
                        warn(line, id, format!("{why}; using earliest stage entry as creation"));
                        first.entered_at
                    }
                    None => {
                        warn(line, id, format!("{why} and no stage history; row skipped"));
                        continue;
                    }
                }
            }
        };

        let name = hx.cell(&row, COL_NAME).trim();
        let amount_raw = hx.cell(&row, COL_AMOUNT).trim();
        let amount = if amount_raw.is_empty() {
            None
        } else {
            match amount_raw.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn(line, id, format!("amount `{amount_raw}` is not a number; ignored"));
                    None
                }
            }
        };

        seen.insert(s!(id));
        deals.push(Deal {
            id: s!(id),
            name: if name.is_empty() { format!("Deal {id}") } else { s!(name) },
            created_at,
            history,
            contact: s!(hx.cell(&row, COL_CONTACT).trim()),
            campaign: clean_campaign(hx.cell(&row, COL_CAMPAIGN)),
            amount,
        });
    }

    out.deals = deals;
    out.rows_read = rows_read;
    Ok(out)
}

/// Campaign cells come back as "", "None" or "nan" when unset.
fn clean_campaign(raw: &str) -> String {
    let t = raw.trim();
    if t.eq_ignore_ascii_case("none") || t.eq_ignore_ascii_case("nan") {
        s!()
    } else {
        s!(t)
    }
}
