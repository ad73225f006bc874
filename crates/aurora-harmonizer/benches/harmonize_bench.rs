// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Harmonizer Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks comparing the sequential and parallel
//! harmonization paths over mixed batches.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use aurora_core::Evolver;
use aurora_harmonizer::{Harmonizer, ParallelHarmonizer};
use aurora_tensor::{FractalTensor, Vector};
use aurora_types::AuroraConfig;

/// Mixed batch: mostly valid tensors plus a sprinkle of guard slots.
fn mixed_batch(rng: &mut StdRng, size: usize) -> Vec<FractalTensor> {
    (0..size)
        .map(|i| {
            let mut level1 = [(); 3].map(|_| {
                Vector::raw(
                    rng.gen_range(0..8),
                    rng.gen_range(0..8),
                    rng.gen_range(0..8),
                )
            });
            if i % 10 == 0 {
                level1[0] = Vector::raw(9, 0, 0);
            }
            FractalTensor::from_raw_level1(level1, rng.gen_range(0..8))
        })
        .collect()
}

fn bench_sequential_30(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(13);
    let batch = mixed_batch(&mut rng, 30);
    c.bench_function("harmonize_seq_30", |b| {
        b.iter(|| {
            let mut evolver = Evolver::new(&AuroraConfig::default());
            let mut harmonizer = Harmonizer::new(&AuroraConfig::default());
            harmonizer.harmonize(&mut evolver, black_box(&batch), "bench")
        })
    });
}

fn bench_parallel_30(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(13);
    let batch = mixed_batch(&mut rng, 30);
    c.bench_function("harmonize_par_30", |b| {
        b.iter(|| {
            let mut evolver = Evolver::new(&AuroraConfig::default());
            let mut harmonizer = ParallelHarmonizer::new(&AuroraConfig::default());
            harmonizer.harmonize(&mut evolver, black_box(&batch), "bench")
        })
    });
}

fn bench_detect_only_100(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(13);
    let batch = mixed_batch(&mut rng, 100);
    c.bench_function("detect_100", |b| {
        b.iter(|| {
            let mut evolver = Evolver::new(&AuroraConfig::default());
            let mut harmonizer = Harmonizer::new(&AuroraConfig::default());
            harmonizer.detect(&mut evolver, black_box(&batch), "bench")
        })
    });
}

criterion_group!(benches, bench_sequential_30, bench_parallel_30, bench_detect_only_100);
criterion_main!(benches);
