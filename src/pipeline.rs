// src/pipeline.rs
//
// The two file-mediated batch steps shared by the CLI and the GUI.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::analysis::Summary;
use crate::config::consts::*;
use crate::config::options::{AnalysisOptions, ExportOptions, PathOptions};
use crate::config::stages::StageMap;
use crate::extract::{deals_to_dataset, last_contact_ids, HubSpotClient};
use crate::error::Result;
use crate::file::write_table;
use crate::ingest::{load_deals, DataWarning};
use crate::progress::Progress;
use crate::snapshot::SnapshotTable;
use crate::store::{extract_file_name, resolve_input};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub deals: usize,
    pub rows: usize,
    pub changes: usize,
    pub warnings: Vec<String>,
}

/// Fetch every deal and its last contact, and write a fresh extract into
/// `data_dir`. Returns the path of the new file.
pub fn run_extract(
    client: &HubSpotClient,
    stages: &StageMap,
    data_dir: &Path,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    progress.begin(0);
    let result = extract_inner(client, stages, data_dir, progress);
    progress.finish();
    result
}

fn extract_inner(
    client: &HubSpotClient,
    stages: &StageMap,
    data_dir: &Path,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let deals = client.fetch_deals(stages, progress)?;
    let ids = last_contact_ids(&deals);
    progress.log(&format!("Retrieved {} deals, looking up {} contacts…", deals.len(), ids.len()));
    let (contacts, warnings) = client.fetch_contacts(&ids, progress);

    let table = deals_to_dataset(&deals, &contacts, stages);
    let path = data_dir.join(extract_file_name(Utc::now()));
    // extract files are always comma-separated with a header
    write_table(&path, &table, &ExportOptions::default())?;

    let msg = format!("Wrote {} deals to {}", table.len(), path.display());
    logf!("{}", msg);
    progress.log(&msg);

    Ok(RunSummary {
        files_written: vec![path],
        deals: table.len(),
        rows: table.len(),
        changes: 0,
        warnings,
    })
}

/// What `run_transform` should read and write.
#[derive(Clone, Debug)]
pub struct TransformJob {
    pub paths: PathOptions,
    pub analysis: AnalysisOptions,
    pub export: ExportOptions,
    /// Also write `summary.json`.
    pub summary: bool,
    pub stagnant_threshold: usize,
}

impl Default for TransformJob {
    fn default() -> Self {
        Self {
            paths: PathOptions::default(),
            analysis: AnalysisOptions::default(),
            export: ExportOptions::default(),
            summary: false,
            stagnant_threshold: DEFAULT_STAGNANT_THRESHOLD,
        }
    }
}

/// Load the input, build snapshots and changes, and write them to
/// `export.out_dir`. Data-quality warnings are returned, not fatal.
pub fn run_transform(job: &TransformJob, today: NaiveDate, progress: &mut dyn Progress) -> Result<RunSummary> {
    progress.begin(0);
    let result = transform_inner(job, today, progress);
    progress.finish();
    result
}

fn transform_inner(job: &TransformJob, today: NaiveDate, progress: &mut dyn Progress) -> Result<RunSummary> {
    let stages = StageMap::resolve(job.paths.stage_map())?;
    let input = resolve_input(job.paths.input(), &job.paths.data_dir)?;
    progress.log(&format!("Reading {}", input.display()));

    let loaded = load_deals(&input, &stages)?;

    let range = job.analysis.resolve(&loaded.deals, today)?;
    progress.log(&format!("Analysing {}", range.describe()));
    let table = SnapshotTable::build(&loaded.deals, &range);

    let snapshots = table.snapshots_dataset();
    let changes = table.changes_dataset();
    let mut written = vec![
        write_table(&job.export.path_for(SNAPSHOTS_STEM), &snapshots, &job.export)?,
        write_table(&job.export.path_for(CHANGES_STEM), &changes, &job.export)?,
    ];

    if job.summary {
        let summary = Summary::build(
            &table,
            &stages,
            job.stagnant_threshold,
            Some(input.clone()),
            loaded.warnings.len(),
        );
        written.push(crate::file::write_json(&job.export.out_dir.join(SUMMARY_FILE), &summary)?);
    }

    for p in &written {
        progress.log(&format!("Wrote {}", p.display()));
    }
    logf!(
        "Transform: {} deals, {} snapshot rows, {} changes, {} warnings",
        table.series.len(),
        snapshots.len(),
        changes.len(),
        loaded.warnings.len()
    );

    Ok(RunSummary {
        files_written: written,
        deals: table.series.len(),
        rows: snapshots.len(),
        changes: changes.len(),
        warnings: loaded.warnings.iter().map(DataWarning::to_string).collect(),
    })
}
