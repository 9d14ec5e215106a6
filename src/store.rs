// src/store.rs
use std::{fs, path::{Path, PathBuf}, time::SystemTime};

use chrono::{DateTime, Utc};

use crate::config::consts::EXTRACT_PREFIX;
use crate::error::{Error, Result};

/// A rectangular table of strings with an optional header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn with_headers(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: Some(headers.iter().map(|h| s!(*h)).collect()),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h == name)
    }
}

/// File name for a new extract taken at `now`.
pub fn extract_file_name(now: DateTime<Utc>) -> String {
    format!("{EXTRACT_PREFIX}{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn is_extract(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else { return false };
    name.starts_with(EXTRACT_PREFIX) && name.ends_with(".csv")
}

/// Most recently modified `hubspot_deals_*.csv` in `dir`.
/// Ties on mtime fall back to the file name (timestamped, so newest sorts last).
pub fn latest_extract(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(Error::NoInput(dir.to_path_buf()));
    }

    let mut best: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_extract(&path) { continue; }
        let mtime = fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let newer = match &best {
            None => true,
            Some((t, p)) => (mtime, &path) > (*t, p),
        };
        if newer { best = Some((mtime, path)); }
    }

    best.map(|(_, p)| p).ok_or_else(|| Error::NoInput(dir.to_path_buf()))
}

/// Explicit input if given, otherwise the latest extract in `data_dir`.
pub fn resolve_input(explicit: Option<&Path>, data_dir: &Path) -> Result<PathBuf> {
    match explicit {
        Some(p) if p.is_file() => Ok(p.to_path_buf()),
        Some(p) => Err(Error::InputNotFound(p.to_path_buf())),
        None => latest_extract(data_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn extract_name_is_timestamped() {
        let t = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(extract_file_name(t), "hubspot_deals_20250307_090501.csv");
    }

    #[test]
    fn only_prefixed_csv_counts() {
        assert!(is_extract(Path::new("data/hubspot_deals_20250101_000000.csv")));
        assert!(!is_extract(Path::new("data/snapshots.csv")));
        assert!(!is_extract(Path::new("data/hubspot_deals_20250101_000000.tsv")));
    }
}
