//! Criterion benchmarks for the physics stepper.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exnihilo_bench::{pairwise_profile, reference_profile};
use exnihilo_engine::LockstepSession;

const FRAME: f32 = 1.0 / 60.0;

fn bench_reference_500(c: &mut Criterion) {
    let config = reference_profile(42, 500);
    let mut session = LockstepSession::new(&config).unwrap();

    // Warm up: one cycle so scratch buffers are sized.
    session.step_sync(&[], FRAME);

    c.bench_function("step_reference_500", |b| {
        b.iter(|| {
            let result = session.step_sync(&[], FRAME);
            black_box(&result);
        });
    });
}

fn bench_pairwise_500(c: &mut Criterion) {
    let config = pairwise_profile(42, 500);
    let mut session = LockstepSession::new(&config).unwrap();

    session.step_sync(&[], FRAME);

    c.bench_function("step_pairwise_500", |b| {
        b.iter(|| {
            let result = session.step_sync(&[], FRAME);
            black_box(&result);
        });
    });
}

fn bench_1000_cycles_reference_100(c: &mut Criterion) {
    c.bench_function("1000_cycles_reference_100", |b| {
        b.iter(|| {
            let config = reference_profile(42, 100);
            let mut session = LockstepSession::new(&config).unwrap();
            for _ in 0..1000 {
                let result = session.step_sync(&[], FRAME);
                black_box(&result);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_reference_500,
    bench_pairwise_500,
    bench_1000_cycles_reference_100
);
criterion_main!(benches);
