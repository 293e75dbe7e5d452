use criterion::{Criterion, criterion_group, criterion_main};
use itempool::{ItemPool, PoolConfig};

fn bench_acquire_release(c: &mut Criterion) {
    let labels: Vec<String> = (0..16).map(|i| format!("item-{i}")).collect();
    let config = PoolConfig::new(16).with_initial_labels(labels);
    let pool = ItemPool::new(config, |label| label.to_owned()).unwrap();

    c.bench_function("acquire_release", |b| {
        b.iter(|| {
            let item = pool.acquire().unwrap();
            pool.release(item).unwrap();
        })
    });
}

criterion_group!(benches, bench_acquire_release);
criterion_main!(benches);
