use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use boardguard::prelude::*;
use boardguard::{Pad, Trace, Via};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A grid of pads, vias and trace stubs at roughly 1mm pitch
fn grid_board(side: usize) -> Vec<PcbObject> {
    let mut objects = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let p = Point::new(col as f64 * 1.05, row as f64 * 0.95);
            let obj = match (row + col) % 3 {
                0 => PcbObject::new("top", Pad::rect(p, 0.6, 0.4)),
                1 => PcbObject::new("top", Via::new(p, 0.6, 0.3)),
                _ => PcbObject::new(
                    "bottom",
                    Trace::new(p, Point::new(p.x + 0.5, p.y), 0.2),
                ),
            };
            objects.push(obj);
        }
    }
    objects
}

fn bench_pairwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("drc");
    for side in [10usize, 30, 60] {
        let objects = grid_board(side);
        group.bench_with_input(BenchmarkId::new("brute_force", objects.len()), &objects, |b, objs| {
            let mut engine = DrcEngine::default();
            b.iter(|| engine.run(black_box(objs)));
        });
        group.bench_with_input(BenchmarkId::new("indexed", objects.len()), &objects, |b, objs| {
            let mut engine = DrcEngine::default();
            b.iter(|| engine.run_indexed(black_box(objs)));
        });
    }
    group.finish();
}

fn bench_validate_board(c: &mut Criterion) {
    let options = ValidationOptions::default();

    c.bench_function("validate_board", |b| {
        b.iter(|| {
            BoardGuardCore::validate_board(
                black_box(&fixture_path("clean.pcb.json")),
                black_box(&options),
            )
        });
    });
}

criterion_group!(benches, bench_pairwise, bench_validate_board);
criterion_main!(benches);
