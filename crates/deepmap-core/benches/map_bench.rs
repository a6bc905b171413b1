//! Performance benchmarks for the deep mapper.
//!
//! Run with:
//! ```bash
//! cargo bench -p deepmap-core
//! ```
//!
//! # Benchmark Categories
//!
//! 1. **Flat**: one wide record and one long sequence of numbers
//! 2. **Nested**: a 100x10 record of records and a 1000-level record chain
//! 3. **Mixed**: records, sequences, dates, aliasing and a self-reference
//!
//! Acyclic fixtures are also mapped with a plain recursive implementation so
//! the cost of the explicit stack and identity map can be compared.

use std::collections::HashMap;
use std::hint::black_box;

use chrono::DateTime;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use deepmap_core::{map_values_deep, ContainerId, Key, Opaque, Record, Seq, Value};

// =============================================================================
// Fixtures
// =============================================================================

fn flat_record() -> Value {
    let record = Record::new();
    for i in 0..1000 {
        record.set(format!("key{}", i), Value::from(i));
    }
    Value::Record(record)
}

fn flat_seq() -> Value {
    Value::seq((0..1000).map(Value::from))
}

fn wide_record() -> Value {
    let record = Record::new();
    for i in 0..100 {
        let inner = Record::new();
        for j in 0..10 {
            inner.set(format!("key{}", j), Value::from(j));
        }
        record.set(format!("key{}", i), Value::Record(inner));
    }
    Value::Record(record)
}

fn deep_record() -> Value {
    let root = Record::new();
    let mut current = root.clone();
    for i in 0..1000 {
        let next = Record::new();
        current.set("value", Value::from(i));
        current.set("next", Value::Record(next.clone()));
        current = next;
    }
    Value::Record(root)
}

/// Mixed structure with dates, aliasing through `lookup` and a `self` cycle.
fn mixed_structure() -> Value {
    let created = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();
    let items: Vec<Value> = (0..100)
        .map(|i| {
            Value::record([
                ("id", Value::from(i)),
                ("values", Value::seq((0..10).map(|j| Value::from(i * j)))),
                (
                    "metadata",
                    Value::record([
                        ("created", Value::from(Opaque::date(created))),
                        (
                            "tags",
                            Value::seq([
                                Value::from(format!("tag{}", i % 10)),
                                Value::from(format!("category{}", i % 5)),
                            ]),
                        ),
                    ]),
                ),
            ])
        })
        .collect();

    let lookup = Record::new();
    for (i, item) in items.iter().enumerate() {
        lookup.set(format!("item{}", i), item.clone());
    }

    let root = Record::new();
    root.set("arr", Value::seq(items));
    root.set("lookup", Value::Record(lookup));
    root.set(
        "stats",
        Value::record([
            ("counts", Value::seq((0..20).map(|i| Value::from(i * 10)))),
            (
                "averages",
                Value::seq((0..20).map(|i| Value::from(f64::from(i) * 1.5))),
            ),
            (
                "metadata",
                Value::record([
                    ("lastUpdated", Value::from(Opaque::date(created))),
                    ("source", Value::from("generated")),
                ]),
            ),
        ]),
    );
    root.set("self", Value::Record(root.clone()));
    Value::Record(root)
}

fn double(value: &Value, _key: &Key, _parent: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(n * 2.0),
        other => other.clone(),
    }
}

// =============================================================================
// Recursive reference
// =============================================================================

/// Straightforward recursive deep map with an identity cache. Depth is
/// limited by the call stack.
fn map_values_recursive(
    root: &Value,
    transform: &mut dyn FnMut(&Value, &Key, &Value) -> Value,
) -> Value {
    if !root.is_container() {
        return transform(root, &Key::root(), &Value::Record(Record::new()));
    }
    let mut cache = HashMap::new();
    recurse(root, &mut cache, transform)
}

fn recurse(
    value: &Value,
    cache: &mut HashMap<ContainerId, Value>,
    transform: &mut dyn FnMut(&Value, &Key, &Value) -> Value,
) -> Value {
    let Some(id) = value.container_id() else {
        return value.clone();
    };
    if let Some(done) = cache.get(&id) {
        return done.clone();
    }
    match value {
        Value::Seq(seq) => {
            let out = Seq::with_len(seq.len());
            cache.insert(id, Value::Seq(out.clone()));
            for (index, member) in seq.entries() {
                let mapped = if member.is_container() {
                    recurse(&member, cache, transform)
                } else {
                    transform(&member, &Key::Index(index), value)
                };
                out.set(index, mapped);
            }
            Value::Seq(out)
        }
        _ => {
            let out = Record::new();
            cache.insert(id, Value::Record(out.clone()));
            for (key, member) in value.own_enumerable() {
                let mapped = if member.is_container() {
                    recurse(&member, cache, transform)
                } else {
                    transform(&member, &key, value)
                };
                out.insert(key, mapped);
            }
            Value::Record(out)
        }
    }
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat");
    for (name, fixture) in [("record", flat_record()), ("sequence", flat_seq())] {
        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(BenchmarkId::new("iterative", name), &fixture, |b, input| {
            b.iter(|| map_values_deep(black_box(input), double))
        });
        group.bench_with_input(BenchmarkId::new("recursive", name), &fixture, |b, input| {
            b.iter(|| map_values_recursive(black_box(input), &mut double))
        });
    }
    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested");
    for (name, fixture) in [("wide", wide_record()), ("deep", deep_record())] {
        group.bench_with_input(BenchmarkId::new("iterative", name), &fixture, |b, input| {
            b.iter(|| map_values_deep(black_box(input), double))
        });
        group.bench_with_input(BenchmarkId::new("recursive", name), &fixture, |b, input| {
            b.iter(|| map_values_recursive(black_box(input), &mut double))
        });
    }
    group.finish();
}

fn bench_mixed(c: &mut Criterion) {
    let fixture = mixed_structure();
    c.bench_function("mixed/iterative", |b| {
        b.iter(|| {
            let output = map_values_deep(black_box(&fixture), double);
            if let Value::Record(record) = &output {
                record.clear();
            }
        })
    });
    if let Value::Record(record) = &fixture {
        record.clear();
    }
}

criterion_group!(benches, bench_flat, bench_nested, bench_mixed);
criterion_main!(benches);
