// benches/snapshots.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

use deal_pipeline::analysis::{stage_distribution, stagnant_deals};
use deal_pipeline::config::stages::StageMap;
use deal_pipeline::core::{AnalysisRange, Granularity};
use deal_pipeline::model::Deal;
use deal_pipeline::snapshot::SnapshotTable;

/// Deterministic synthetic pipeline: deals created across two years, each
/// walking a few stages a couple of weeks apart.
fn synthetic_deals(n: usize, stages: &StageMap) -> Vec<Deal> {
    let names: Vec<&str> = stages.names().collect();
    let origin = Utc.with_ymd_and_hms(2023, 1, 2, 9, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let created = origin + Duration::hours((i as i64 * 37) % (24 * 700));
            let mut deal = Deal::new(i.to_string(), format!("Deal {i}"), created);
            let steps = i % 5;
            for k in 0..steps {
                let stage = names[(i + k * 3) % names.len()];
                deal = deal.with_stage(stage, created + Duration::days(3 + 14 * k as i64));
            }
            deal
        })
        .collect()
}

fn bench_snapshots(c: &mut Criterion) {
    let stages = StageMap::hubspot_default();
    let deals = synthetic_deals(5_000, &stages);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    for g in Granularity::ALL {
        let range = AnalysisRange::new(start, end, g).unwrap();
        c.bench_function(&format!("build_{}", g.label().to_lowercase()), |b| {
            b.iter(|| {
                let table = SnapshotTable::build(black_box(&deals), &range);
                black_box(table.snapshot_count())
            })
        });
    }

    let range = AnalysisRange::new(start, end, Granularity::Weekly).unwrap();
    let table = SnapshotTable::build(&deals, &range);

    c.bench_function("changes_weekly", |b| {
        b.iter(|| black_box(table.changes().len()))
    });

    c.bench_function("analysis_weekly", |b| {
        b.iter(|| {
            let dist = stage_distribution(black_box(&table), &stages);
            let stagnant = stagnant_deals(&table);
            black_box((dist.len(), stagnant.len()))
        })
    });
}

criterion_group!(benches, bench_snapshots);
criterion_main!(benches);
