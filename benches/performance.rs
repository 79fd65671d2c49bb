// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyfold::geometry::builtin;
use polyfold::unfold::{solve, Layout};
use polyfold::{analyze, AnalysisConfig, Primitive, RootPlacement};

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let config = AnalysisConfig::default();

    for name in ["cube", "icosahedron", "octagonal-prism", "two-cubes"] {
        let mesh = builtin(name).unwrap();
        group.bench_with_input(BenchmarkId::new("builtin", name), &mesh, |b, mesh| {
            b.iter(|| analyze(black_box(mesh), &config).unwrap());
        });
    }

    for divisions in [4, 16, 32] {
        let mesh = Primitive::tessellated_cube(1.0, divisions).to_mesh();
        group.bench_with_input(
            BenchmarkId::new("tessellated_cube", divisions),
            &mesh,
            |b, mesh| {
                b.iter(|| analyze(black_box(mesh), &config).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");
    let mut config = AnalysisConfig::default();

    for placement in [RootPlacement::Identity, RootPlacement::Spread] {
        config.unfold.root_placement = placement;
        let analysis = analyze(&builtin("two-cubes").unwrap(), &config).unwrap();
        let layout = Layout::new(&analysis, &config.unfold);

        group.bench_function(BenchmarkId::new("two_cubes", placement.as_str()), |b| {
            b.iter(|| solve(&analysis, &layout, black_box(0.5), config.unfold.axis_epsilon));
        });
    }

    let analysis = analyze(&builtin("icosahedron").unwrap(), &config).unwrap();
    let layout = Layout::new(&analysis, &config.unfold);
    group.bench_function("icosahedron_sweep", |b| {
        b.iter(|| {
            for step in 0..=60 {
                black_box(solve(
                    &analysis,
                    &layout,
                    step as f64 / 60.0,
                    config.unfold.axis_epsilon,
                ));
            }
        });
    });

    group.bench_function("layout_spread", |b| {
        b.iter(|| Layout::new(black_box(&analysis), &config.unfold));
    });

    group.finish();
}

criterion_group!(benches, bench_analysis, bench_frames);
criterion_main!(benches);
