// src/cli.rs
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::config::consts::*;
use crate::config::options::{AnalysisOptions, ExportFormat, ExportOptions, PathOptions};
use crate::config::stages::StageMap;
use crate::core::Granularity;
use crate::core::time::parse_date;
use crate::error::Result;
use crate::extract::HubSpotClient;
use crate::pipeline::{run_extract, run_transform, RunSummary, TransformJob};
use crate::progress::Progress;

#[derive(Parser, Debug)]
#[command(name = "deal_pipeline")]
#[command(about = "Extract HubSpot deals and build periodic stage snapshots", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch all deals from HubSpot into a new timestamped extract
    Extract {
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        #[arg(long)]
        stage_map: Option<PathBuf>,

        /// Bearer token (private app access token)
        #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
        token: Option<String>,
    },

    /// Turn the latest (or given) extract into snapshots and stage changes
    Transform {
        /// Deals file; defaults to the newest hubspot_deals_*.csv in --data-dir
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,

        /// daily | weekly | monthly
        #[arg(short, long, default_value = "weekly", value_parser = parse_granularity)]
        granularity: Granularity,

        /// First day of the window (YYYY-MM-DD); defaults to the earliest deal
        #[arg(long, value_parser = parse_day)]
        start: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD); defaults to today or the latest deal
        #[arg(long, value_parser = parse_day, conflicts_with = "periods")]
        end: Option<NaiveDate>,

        /// Exactly this many periods from --start
        #[arg(long)]
        periods: Option<usize>,

        /// csv | tsv
        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: ExportFormat,

        #[arg(long)]
        no_headers: bool,

        /// Also write summary.json
        #[arg(long)]
        summary: bool,

        #[arg(long, default_value_t = DEFAULT_STAGNANT_THRESHOLD)]
        stagnant_threshold: usize,

        #[arg(long)]
        stage_map: Option<PathBuf>,
    },

    /// Print the active stage mapping as TOML
    Stages {
        #[arg(long)]
        stage_map: Option<PathBuf>,
    },
}

fn parse_granularity(s: &str) -> std::result::Result<Granularity, String> {
    s.parse()
}

fn parse_format(s: &str) -> std::result::Result<ExportFormat, String> {
    s.parse()
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got '{s}'"))
}

/// Prints progress lines to stderr.
struct CliProgress;

impl Progress for CliProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
}

pub fn run() -> Result<()> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> Result<()> {
    let mut progress = CliProgress;
    match cli.command {
        Command::Extract { data_dir, stage_map, token } => {
            let stages = StageMap::resolve(stage_map.as_deref())?;
            let client = match token {
                Some(t) if !t.trim().is_empty() => HubSpotClient::new(t.trim()),
                _ => HubSpotClient::from_env()?,
            };
            let summary = run_extract(&client, &stages, &data_dir, &mut progress)?;
            println!("{} deals", summary.deals);
            report(&summary);
        }
        Command::Transform {
            input, data_dir, out_dir, granularity, start, end, periods,
            format, no_headers, summary, stagnant_threshold, stage_map,
        } => {
            let job = TransformJob {
                paths: PathOptions { data_dir, input, stage_map },
                analysis: AnalysisOptions { granularity, start, end, periods },
                export: ExportOptions { format, include_headers: !no_headers, out_dir },
                summary,
                stagnant_threshold,
            };
            let today = Utc::now().date_naive();
            let summary = run_transform(&job, today, &mut progress)?;
            println!(
                "{} deals, {} snapshot rows, {} stage changes",
                summary.deals, summary.rows, summary.changes
            );
            report(&summary);
        }
        Command::Stages { stage_map } => {
            let stages = StageMap::resolve(stage_map.as_deref())?;
            print!("{}", stages.to_toml_string()?);
        }
    }
    Ok(())
}

fn report(summary: &RunSummary) {
    if !summary.warnings.is_empty() {
        println!("{} warning(s)", summary.warnings.len());
    }
    for p in &summary.files_written {
        println!("{}", p.display());
    }
}
