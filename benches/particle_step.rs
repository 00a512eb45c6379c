//! Benchmarks for the per-frame CPU work: emission, integration and packing.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sponge::prelude::*;

fn filled_pool(count: usize) -> ParticlePool {
    let mut pool = ParticlePool::new();
    let mut rng = StdRng::seed_from_u64(3);
    while pool.active_count() < count {
        if emit(&mut pool, Splash::Click, Vec2::new(0.0, 0.5), &mut rng) == 0 {
            break;
        }
    }
    for index in count..MAX_PARTICLES {
        pool.deactivate(index);
    }
    pool
}

fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");

    for count in [100, 500, MAX_PARTICLES] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched_ref(
                || filled_pool(count),
                |pool| black_box(integrate::step(pool, 0.016)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let pool = filled_pool(MAX_PARTICLES);
    let mut bridge = RenderBridge::new();

    c.bench_function("pack_full_pool", |b| {
        b.iter(|| black_box(bridge.pack(&pool).len()))
    });
}

fn bench_click_splash(c: &mut Criterion) {
    c.bench_function("click_splash_into_half_pool", |b| {
        let mut rng = StdRng::seed_from_u64(11);
        b.iter_batched_ref(
            || filled_pool(MAX_PARTICLES / 2),
            |pool| black_box(emit(pool, Splash::Click, Vec2::ZERO, &mut rng)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_frame(c: &mut Criterion) {
    c.bench_function("scene_step_wet_click", |b| {
        let input = FrameInput {
            cursor: Vec2::new(0.0, -0.5),
            clicking: true,
            ..Default::default()
        };
        b.iter_batched_ref(
            || Scene::new(0.5, Some(1)),
            |scene| black_box(scene.step(0.016, &input)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_integrate, bench_pack, bench_click_splash, bench_frame);
criterion_main!(benches);
