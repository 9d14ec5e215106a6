// tests/ingest.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};

use deal_pipeline::config::stages::{StageDef, StageGroup, StageMap};
use deal_pipeline::error::Error;
use deal_pipeline::ingest::{load_deals, parse_deals};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("deal_pipeline_ingest_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn stage(field: &str, name: &str) -> StageDef {
    StageDef { field: field.into(), name: name.into(), group: StageGroup::Neutral, color: None }
}

fn small_map() -> StageMap {
    StageMap::new(vec![
        stage("entered_signup", "Sign-up"),
        stage("entered_demo", "Demo Booked"),
        stage("entered_won", "Closed Won"),
    ])
    .unwrap()
}

const HEADER: &str = "deal_id,created_at,updated_at,dealname,entered_signup,entered_demo,entered_won,hs_deal_amount,last_contact_name,last_contact_lemlist_campaign";

fn parse(body: &str) -> deal_pipeline::ingest::LoadedDeals {
    let text = format!("{HEADER}\n{body}");
    parse_deals(&text, &small_map(), Path::new("deals.csv")).unwrap()
}

#[test]
fn clean_rows_become_sorted_histories() {
    let loaded = parse(
        "1,2025-01-02T09:00:00Z,,Acme,2025-01-02T09:00:00.000Z,2025-01-10T10:30:00Z,,1200.5,Ada Lovelace,Q1 Outbound\n",
    );
    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    let deal = &loaded.deals[0];
    assert_eq!(deal.name, "Acme");
    assert_eq!(deal.created_at, Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap());
    let names: Vec<&str> = deal.history.iter().map(|e| e.stage.as_str()).collect();
    assert_eq!(names, ["Sign-up", "Demo Booked"]);
    assert_eq!(deal.amount, Some(1200.5));
    assert_eq!(deal.contact, "Ada Lovelace");
    assert_eq!(deal.campaign, "Q1 Outbound");
}

#[test]
fn bad_stage_timestamp_is_dropped_with_warning() {
    let loaded = parse("1,2025-01-02,,Acme,2025-01-02,yesterday,2025-02-01,,,\n");
    assert_eq!(loaded.deals.len(), 1);
    assert_eq!(loaded.deals[0].history.len(), 2);
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].line, 2);
    assert_eq!(loaded.warnings[0].deal_id, "1");
    assert!(loaded.warnings[0].message.contains("entered_demo"));
}

#[test]
fn missing_creation_falls_back_to_earliest_stage() {
    let loaded = parse("1,,,Acme,,2025-01-10,2025-01-05,,,\n2,,,NoHistory,,,,,,\n");
    assert_eq!(loaded.deals.len(), 1);
    assert_eq!(loaded.deals[0].created_at, Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap());
    assert_eq!(loaded.deals[0].history[0].stage, "Closed Won");
    assert_eq!(loaded.warnings.len(), 2);
    assert!(loaded.warnings[1].message.contains("row skipped"));
    assert_eq!(loaded.skipped(), 1);
}

#[test]
fn blank_and_duplicate_ids_are_skipped() {
    let loaded = parse(
        "1,2025-01-01,,First,,,,,,\n,2025-01-01,,NoId,,,,,,\n1,2025-01-03,,Again,,,,,,\n2,2025-01-04,,,,,,,,None\n",
    );
    let ids: Vec<&str> = loaded.deals.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(loaded.deals[0].name, "First");
    assert_eq!(loaded.deals[1].name, "Deal 2");
    assert_eq!(loaded.deals[1].campaign, "");
    assert_eq!(loaded.rows_read, 4);
    assert_eq!(loaded.warnings.len(), 2);
}

#[test]
fn skipped_row_does_not_claim_its_id() {
    // first "7" has neither creation time nor history and is dropped
    let loaded = parse("7,,,Broken,,,,,,\n7,2025-01-05,,Fixed,,,,,,\n");
    assert_eq!(loaded.deals.len(), 1);
    assert_eq!(loaded.deals[0].name, "Fixed");
    assert_eq!(loaded.warnings.len(), 1, "{:?}", loaded.warnings);
    assert!(loaded.warnings[0].message.contains("row skipped"));
    assert!(!loaded.warnings[0].message.contains("duplicate"));
}

#[test]
fn epoch_millis_and_naive_datetimes_are_accepted() {
    let loaded = parse("1,1735776000000,,Epoch,2025-01-02 08:15:00,,,,,\n");
    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    let deal = &loaded.deals[0];
    assert_eq!(deal.created_at, Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
    assert_eq!(deal.history[0].entered_at, Utc.with_ymd_and_hms(2025, 1, 2, 8, 15, 0).unwrap());
}

#[test]
fn unmapped_stage_columns_warn_once() {
    let text = "deal_id,created_at,dealname,entered_signup\n1,2025-01-01,A,2025-01-01\n2,2025-01-02,B,\n";
    let loaded = parse_deals(text, &small_map(), Path::new("deals.csv")).unwrap();
    assert_eq!(loaded.deals.len(), 2);
    let missing: Vec<_> = loaded.warnings.iter().filter(|w| w.line == 1).collect();
    assert_eq!(missing.len(), 2);
}

#[test]
fn missing_required_column_is_a_configuration_error() {
    let text = "deal_id,dealname\n1,A\n";
    let err = parse_deals(text, &small_map(), Path::new("deals.csv")).unwrap_err();
    match err {
        Error::MissingColumn { column, .. } => assert_eq!(column, "created_at"),
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn tab_separated_files_are_sniffed() {
    let text = "deal_id\tcreated_at\tdealname\tentered_signup\n1\t2025-01-01\tA, Inc\t2025-01-01\n";
    let loaded = parse_deals(text, &small_map(), Path::new("deals.tsv")).unwrap();
    assert_eq!(loaded.deals[0].name, "A, Inc");
}

#[test]
fn load_reports_missing_file_and_records_source() {
    let dir = tmp_dir("load");
    let missing = dir.join("nope.csv");
    assert!(matches!(load_deals(&missing, &small_map()), Err(Error::InputNotFound(_))));

    let path = dir.join("hubspot_deals_20250101_000000.csv");
    fs::write(&path, format!("{HEADER}\n1,2025-01-01,,A,,,,,,\n")).unwrap();
    let loaded = load_deals(&path, &small_map()).unwrap();
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    assert!(loaded.modified.is_some());
}
