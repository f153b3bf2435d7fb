use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orienteer_env::op::{baselines, BatchShape, CapacityTable, EnvParams, Instance};

fn bench_greedy_rollout(c: &mut Criterion) {
    let capacities = CapacityTable::default();
    for num_loc in [20, 50, 100] {
        let instance =
            Instance::generate_instance(&[7u8; 32], &EnvParams::new(num_loc), &BatchShape::from(256))
                .unwrap();
        c.bench_function(&format!("greedy_rollout_op{}_b256", num_loc), |b| {
            b.iter(|| {
                let (state, _) = instance
                    .rollout(&capacities, baselines::greedy::select_actions)
                    .unwrap();
                black_box(state.prize_collected)
            })
        });
    }
}

fn bench_reset(c: &mut Criterion) {
    let capacities = CapacityTable::default();
    let instance =
        Instance::generate_instance(&[7u8; 32], &EnvParams::new(100), &BatchShape::from(256))
            .unwrap();
    c.bench_function("reset_op100_b256", |b| {
        b.iter(|| black_box(instance.reset(&capacities).unwrap()))
    });
}

criterion_group!(benches, bench_greedy_rollout, bench_reset);
criterion_main!(benches);
