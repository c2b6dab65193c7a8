use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use recgrid::{
    controller::RecordGridController,
    core::store::RecordStore,
    record::RecordDraft,
    schema::{FieldSpec, Schema},
};

fn schema() -> Schema {
    Schema::new(vec![
        FieldSpec::text("name").required().searchable(),
        FieldSpec::text("position").searchable(),
        FieldSpec::number("age"),
    ])
    .expect("schema")
}

fn draft(i: u64) -> RecordDraft {
    RecordDraft::new()
        .with("name", format!("Employee {i}"))
        .with("position", if i % 3 == 0 { "Manager" } else { "Engineer" })
        .with("age", (20 + i % 40) as f64)
        .disabled(i % 7 == 0)
}

fn grid(n: u64) -> RecordGridController {
    RecordGridController::new(schema(), (0..n).map(draft))
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("store_from_drafts_50k", |b| {
        b.iter(|| {
            let store = RecordStore::from_drafts((0..50_000u64).map(draft));
            assert_eq!(store.len(), 50_000);
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_with_search");
    let mut grid = grid(50_000);

    for term in ["employee 4", "manager", "zzz"] {
        grid.set_search(term);
        group.bench_with_input(BenchmarkId::from_parameter(term), &term, |b, _| {
            b.iter(|| {
                let _ = grid.visible_records().len();
            });
        });
    }

    group.finish();
}

fn bench_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_view");
    let mut grid = grid(50_000);

    for size in [5usize, 10, 20] {
        grid.set_page_size(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                if !grid.next_page() {
                    grid.first_page();
                }
                let _ = grid.page_view();
            });
        });
    }

    group.finish();
}

fn bench_soft_delete_cycle(c: &mut Criterion) {
    c.bench_function("soft_delete_restore_10k", |b| {
        let mut grid = grid(10_000);
        b.iter(|| {
            for id in 1..=1_000u64 {
                let _ = grid.soft_delete(id);
                let _ = grid.restore(id);
            }
            grid.drain_events();
        });
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_search,
    bench_paging,
    bench_soft_delete_cycle
);
criterion_main!(benches);
