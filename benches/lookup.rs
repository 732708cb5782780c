use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nfd_strategy_choice::core::name::Name;
use nfd_strategy_choice::plugins::{best_route, broadcast};
use nfd_strategy_choice::subsystems;

/// Table with `n` assignments spread over a two-level hierarchy.
fn populated_table(n: usize) -> nfd_strategy_choice::core::strategy_choice::StrategyChoice {
    let mut table = subsystems::builtin_table(&best_route::STRATEGY_NAME.parse().unwrap()).unwrap();
    let broadcast: Name = broadcast::STRATEGY_NAME.parse().unwrap();
    for i in 0..n {
        let prefix: Name = format!("/site-{}/app-{}", i % 64, i).parse().unwrap();
        table.insert(&prefix, &broadcast).unwrap();
    }
    table
}

fn bench_effective_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("effective_strategy");
    for size in [16usize, 1024, 16384] {
        let table = populated_table(size);
        let hit: Name = "/site-3/app-3/video/segment/42".parse().unwrap();
        let miss: Name = "/unrelated/deep/name/with/many/components".parse().unwrap();

        group.bench_with_input(BenchmarkId::new("assigned_ancestor", size), &hit, |b, name| {
            b.iter(|| black_box(table.find_effective_strategy_name(black_box(name))));
        });
        group.bench_with_input(BenchmarkId::new("root_fallback", size), &miss, |b, name| {
            b.iter(|| black_box(table.find_effective_strategy_name(black_box(name))));
        });
    }
    group.finish();
}

fn bench_set_unset(c: &mut Criterion) {
    let broadcast: Name = broadcast::STRATEGY_NAME.parse().unwrap();
    let prefix: Name = "/site-1/app-new/live".parse().unwrap();
    let mut table = populated_table(1024);

    c.bench_function("set_then_unset", |b| {
        b.iter(|| {
            table.insert(&prefix, &broadcast).unwrap();
            table.erase(&prefix).unwrap();
        });
    });
}

criterion_group!(benches, bench_effective_strategy, bench_set_unset);
criterion_main!(benches);
