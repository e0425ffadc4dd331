//! Benchmarks for per-frame rope work.
//!
//! Run with: cargo bench -p sim-rope
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p sim-rope -- --save-baseline main
//! 2. After changes: cargo bench -p sim-rope -- --baseline main

#![allow(missing_docs, clippy::unwrap_used, clippy::cast_possible_truncation)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use loop_curves::{AnalyticCurve, Curve2D};
use nalgebra::Point2;
use sim_planar::World;
use sim_planar_types::SimulationConfig;
use sim_rope::{ChainId, CurveReconstructor, RopeConfig, RopeSimulation};

// =============================================================================
// Scene Setup
// =============================================================================

fn teardrop_scene(segments: usize) -> (RopeSimulation<World>, ChainId) {
    let mut sim = RopeSimulation::new(World::new(SimulationConfig::default().with_gravity(9.81)));
    let teardrop = AnalyticCurve::teardrop(Point2::new(-3.0, 1.5), Point2::origin(), 1.0, 2);
    let rope = sim
        .spawn_rope(&teardrop, &RopeConfig::closed_loop(segments), None)
        .unwrap();
    // Let the rope move away from its construction pose.
    sim.run(10).unwrap();
    (sim, rope)
}

// =============================================================================
// Reconstruction
// =============================================================================

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");

    for segments in [12, 30, 60] {
        let (sim, rope) = teardrop_scene(segments);
        group.throughput(Throughput::Elements(segments as u64));

        group.bench_with_input(BenchmarkId::new("curve", segments), &segments, |b, _| {
            b.iter(|| black_box(sim.curve(black_box(rope)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("curve_and_sample", segments), &segments, |b, _| {
            b.iter(|| {
                let frame = sim.curve(rope).unwrap();
                black_box(frame.curve.sample_uniform(200))
            });
        });

        let chain = sim.chain(rope).unwrap();
        group.bench_with_input(BenchmarkId::new("anchors", segments), &segments, |b, _| {
            b.iter(|| black_box(CurveReconstructor::anchor_points(sim.backend(), chain).unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Stepping
// =============================================================================

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for segments in [12, 30] {
        group.throughput(Throughput::Elements(segments as u64));
        group.bench_with_input(BenchmarkId::new("frame", segments), &segments, |b, &segments| {
            let (mut sim, _) = teardrop_scene(segments);
            b.iter(|| sim.step().unwrap());
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_reconstruct, bench_step);

criterion_main!(benches);
