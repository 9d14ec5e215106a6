// tests/snapshot_generation.rs
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use deal_pipeline::core::{AnalysisRange, Granularity};
use deal_pipeline::model::Deal;
use deal_pipeline::snapshot::SnapshotTable;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(y: i32, m: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, day, 12, 0, 0).unwrap()
}

fn example_deal() -> Deal {
    Deal::new("101", "Acme", t(2025, 1, 2))
        .with_stage("Demo Booked", t(2025, 1, 10))
        .with_stage("Closed Won", t(2025, 1, 20))
}

fn stages(table: &SnapshotTable) -> Vec<Option<String>> {
    table.snapshots().into_iter().map(|s| s.stage).collect()
}

#[test]
fn weekly_example_from_creation_to_close() {
    let range = AnalysisRange::with_periods(d(2025, 1, 1), Granularity::Weekly, 4).unwrap();
    let table = SnapshotTable::build(&[example_deal()], &range);

    assert_eq!(
        stages(&table),
        vec![None, Some(s("Demo Booked")), Some(s("Demo Booked")), Some(s("Closed Won"))]
    );

    let changes = table.changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].previous_stage, None);
    assert_eq!(changes[0].current_stage.as_deref(), Some("Demo Booked"));
    assert_eq!(changes[0].changed_at, Some(t(2025, 1, 10)));
    assert_eq!(changes[1].previous_stage.as_deref(), Some("Demo Booked"));
    assert_eq!(changes[1].current_stage.as_deref(), Some("Closed Won"));
    assert_eq!(changes[1].period.start, d(2025, 1, 20));
}

fn s(x: &str) -> String { x.to_string() }

#[test]
fn stage_carries_forward_through_quiet_periods() {
    let deal = Deal::new("1", "Quiet", t(2025, 1, 1)).with_stage("Sign-up", t(2025, 1, 1));
    let range = AnalysisRange::new(d(2025, 1, 1), d(2025, 3, 31), Granularity::Weekly).unwrap();
    let table = SnapshotTable::build(&[deal], &range);

    let st = stages(&table);
    assert!(st.len() > 10);
    assert!(st.iter().all(|x| x.as_deref() == Some("Sign-up")));
    assert!(table.changes().is_empty());
}

#[test]
fn row_count_runs_from_creation_period_to_range_end() {
    let range = AnalysisRange::new(d(2025, 1, 1), d(2025, 1, 31), Granularity::Daily).unwrap();
    let deals = vec![
        Deal::new("early", "Before range", t(2024, 6, 1)),
        Deal::new("mid", "Mid range", t(2025, 1, 15)),
        Deal::new("late", "After range", t(2025, 2, 10)),
    ];
    let table = SnapshotTable::build(&deals, &range);

    let ids: Vec<&str> = table.series.iter().map(|s| s.deal_id.as_str()).collect();
    assert_eq!(ids, ["early", "mid"]);
    assert_eq!(table.series[0].cells.len(), 31);
    assert_eq!(table.series[1].cells.len(), 17);
    assert_eq!(table.series[1].first, 14);
    assert_eq!(table.snapshot_count(), 48);
}

#[test]
fn monthly_periods_use_calendar_months() {
    let deal = Deal::new("7", "Monthly", t(2024, 11, 20))
        .with_stage("Sign-up", t(2024, 11, 21))
        .with_stage("Demo Booked", t(2025, 1, 31))
        .with_stage("Closed Lost", t(2025, 2, 1));
    let range = AnalysisRange::new(d(2024, 11, 5), d(2025, 2, 3), Granularity::Monthly).unwrap();
    let table = SnapshotTable::build(&[deal], &range);

    let starts: Vec<NaiveDate> = table.periods.iter().map(|p| p.start).collect();
    assert_eq!(starts, [d(2024, 11, 1), d(2024, 12, 1), d(2025, 1, 1), d(2025, 2, 1)]);
    assert_eq!(
        stages(&table),
        vec![
            Some(s("Sign-up")),
            Some(s("Sign-up")),
            Some(s("Demo Booked")),
            Some(s("Closed Lost")),
        ]
    );
}

#[test]
fn change_count_never_exceeds_rows_minus_one() {
    let mut deal = Deal::new("x", "Busy", t(2025, 1, 1));
    for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
        deal = deal.with_stage(*name, t(2025, 1, 2 + i as u32));
    }
    let range = AnalysisRange::with_periods(d(2025, 1, 1), Granularity::Daily, 8).unwrap();
    let table = SnapshotTable::build(&[deal], &range);

    let rows = table.snapshot_count();
    let changes = table.changes();
    assert!(changes.len() < rows);
    // each adjacent differing pair is one change, and only those
    let snaps = table.snapshots();
    let differing = snaps.windows(2).filter(|w| w[0].stage != w[1].stage).count();
    assert_eq!(changes.len(), differing);
}

#[test]
fn same_period_moves_show_only_the_final_stage() {
    let deal = Deal::new("9", "Fast", t(2025, 1, 6))
        .with_stage("Sign-up", t(2025, 1, 6))
        .with_stage("Demo Booked", t(2025, 1, 7))
        .with_stage("Demo Done", t(2025, 1, 8));
    let range = AnalysisRange::with_periods(d(2025, 1, 6), Granularity::Weekly, 2).unwrap();
    let table = SnapshotTable::build(&[deal], &range);
    assert_eq!(stages(&table), vec![Some(s("Demo Done")), Some(s("Demo Done"))]);
    assert!(table.changes().is_empty());
}

#[test]
fn matrix_has_fixed_columns_then_one_per_period() {
    let range = AnalysisRange::with_periods(d(2025, 1, 1), Granularity::Weekly, 4).unwrap();
    let table = SnapshotTable::build(&[example_deal()], &range);
    let m = table.matrix_dataset();

    let headers = m.headers.unwrap();
    assert_eq!(&headers[..4], ["Deal Name", "Deal ID", "Created", "Lemlist Campaign"]);
    assert_eq!(&headers[4..], ["2024-12-30", "2025-01-06", "2025-01-13", "2025-01-20"]);
    assert_eq!(m.rows[0][4..], [s(""), s("Demo Booked"), s("Demo Booked"), s("Closed Won")]);
}

#[test]
fn snapshot_rows_use_inclusive_period_end_and_utc_millis() {
    let range = AnalysisRange::with_periods(d(2025, 1, 1), Granularity::Weekly, 4).unwrap();
    let table = SnapshotTable::build(&[example_deal()], &range);
    let ds = table.snapshots_dataset();

    assert_eq!(ds.rows.len(), 4);
    assert_eq!(
        ds.rows[1],
        vec![
            s("101"), s("Acme"), s("2025-01-06"), s("2025-01-12"),
            s("Demo Booked"), s("2025-01-10T12:00:00.000Z"),
        ]
    );
    // first week: deal exists, no stage yet
    assert_eq!(ds.rows[0][4], "");
    assert_eq!(ds.rows[0][5], "");
}
