//! View projection and estimation throughput over the built-in table.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use milstat::data::CountryTable;
use milstat::estimate::{estimate_equipment, global_ranking, EquipmentCategory, EstimateSource, Rng};
use milstat::views::{project_category, projection_rows, StatCategory, YearOrder};

const SELECTION: [&str; 4] = ["United States", "China", "Russia", "Japan"];

fn bench_views(c: &mut Criterion) {
    let table = CountryTable::builtin().expect("builtin table should load");

    let mut group = c.benchmark_group("views");
    for category in StatCategory::ALL {
        group.bench_function(category.as_str(), |b| {
            b.iter(|| {
                project_category(
                    black_box(&table),
                    category,
                    black_box(&SELECTION),
                    YearOrder::FirstSeen,
                )
                .expect("view should project")
            })
        });
    }
    group.bench_function("projections", |b| {
        b.iter(|| projection_rows(black_box(&table)))
    });
    group.finish();
}

fn bench_estimates(c: &mut Criterion) {
    let table = CountryTable::builtin().expect("builtin table should load");

    let mut group = c.benchmark_group("estimates");
    group.bench_function("deterministic", |b| {
        b.iter(|| {
            estimate_equipment(black_box(&table), &SELECTION, EstimateSource::Deterministic)
                .expect("estimates")
        })
    });
    group.bench_function("randomized_seeded", |b| {
        b.iter(|| {
            let mut rng = Rng::new(black_box(7));
            estimate_equipment(&table, &SELECTION, EstimateSource::Randomized(&mut rng))
                .expect("estimates")
        })
    });
    group.bench_function("global_ranking_tanks", |b| {
        b.iter(|| global_ranking(black_box(&table), EquipmentCategory::Tanks))
    });
    group.finish();
}

criterion_group!(benches, bench_views, bench_estimates);
criterion_main!(benches);
