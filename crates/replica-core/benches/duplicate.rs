//! Benchmarks for graph duplication and reuse analysis.
//!
//! Run with: cargo bench -p replica-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use replica_core::Replicator;
use replica_model::{ContainerRef, ContainerType, RecordRef, Value};
use replica_test_utils::fixture_registry;
use replica_test_utils::fixtures::GraphNode;

/// Ring of `len` nodes, each also listing its two successors as peers
fn build_ring(len: usize) -> Value {
    let nodes: Vec<RecordRef> = (0..len)
        .map(|i| {
            RecordRef::new(GraphNode {
                label: i64::try_from(i).unwrap_or(i64::MAX),
                ..GraphNode::default()
            })
        })
        .collect();

    for (i, node) in nodes.iter().enumerate() {
        let next = &nodes[(i + 1) % len];
        let after = &nodes[(i + 2) % len];
        node.set("next", Value::Record(next.clone())).unwrap();
        let peers = ContainerRef::from_values(
            ContainerType::VEC,
            [Value::Record(next.clone()), Value::Record(after.clone())],
        )
        .unwrap();
        node.set("peers", Value::Container(peers)).unwrap();
    }

    Value::Record(nodes[0].clone())
}

fn bench_duplicate(c: &mut Criterion) {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);
    let mut group = c.benchmark_group("duplicate");

    for len in [10, 100, 1_000] {
        let root = build_ring(len);

        group.bench_with_input(BenchmarkId::new("ring", len), &len, |b, _| {
            b.iter(|| black_box(replicator.duplicate(black_box(&root)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("necessity", len), &len, |b, _| {
            b.iter(|| {
                black_box(
                    replicator
                        .needs_independent_copy(black_box(&root), None)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_duplicate);
criterion_main!(benches);
