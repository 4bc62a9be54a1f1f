use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sampled_metrics::{Counter, Metric, PrefixedRegistry, Registry, StandardRegistry};

fn registry_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    group.bench_function("cached get_or_register", |b| {
        let registry = StandardRegistry::new();
        registry.must_register("simple_key", Metric::from(Counter::new()));

        b.iter(|| registry.get_or_register_counter("simple_key"))
    });
    group.bench_function("cached get_or_register (prefixed)", |b| {
        let registry = PrefixedRegistry::standalone("prefix.");
        registry.must_register("simple_key", Metric::from(Counter::new()));

        b.iter(|| registry.get_or_register_counter("simple_key"))
    });
    group.bench_function("uncached get_or_register", |b| {
        b.iter_batched_ref(
            StandardRegistry::new,
            |registry| registry.get_or_register_counter("simple_key"),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("uncached histogram", |b| {
        b.iter_batched_ref(
            StandardRegistry::new,
            |registry| registry.get_or_register_histogram("simple_key"),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("get_all (100 counters)", |b| {
        let registry = StandardRegistry::new();
        for i in 0..100 {
            registry.must_register(&format!("counter_{}", i), Metric::from(Counter::new()));
        }

        b.iter(|| registry.get_all())
    });
    group.bench_function("registry overhead", |b| {
        b.iter_batched(|| (), |_| StandardRegistry::new(), BatchSize::NumIterations(1))
    });
    group.finish();
}

criterion_group!(benches, registry_benchmark);
criterion_main!(benches);
