//! Benchmarks for hierarchy generation.
//!
//! Tests:
//! - End-to-end generation of the e-commerce schema at several scales (rows discarded)
//! - Single value generation per generator kind
//! - CSV writing throughput

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fixture_forge::config::{SchemaConfig, Strictness};
use fixture_forge::generator::{generate_value, random::seeded_rng, RowContext};
use fixture_forge::progress::NoProgress;
use fixture_forge::sink::{CsvSinkFactory, DiscardSinkFactory};
use fixture_forge::{Column, CounterStore, Generator, GeneratorSpec, Schema};
use fixture_schemas::{ecommerce, Scale};
use std::hint::black_box;
use tempfile::TempDir;

fn ecommerce_schema(scale: Scale) -> Schema {
    let config: SchemaConfig = serde_json::from_value(ecommerce(scale)).unwrap();
    config.build(Strictness::Lenient).unwrap().schema
}

/// Benchmark full generation with discarding sinks
fn bench_generate_discard(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_discard");
    group.sample_size(20);

    for scale in [Scale::Small, Scale::Medium, Scale::Large] {
        let schema = ecommerce_schema(scale);
        let total: u64 = scale.ecommerce_row_counts().iter().map(|(_, n)| n).sum();
        group.throughput(Throughput::Elements(total));
        group.bench_with_input(
            BenchmarkId::new("ecommerce", format!("{:?}", scale)),
            &schema,
            |b, schema| {
                b.iter(|| {
                    let mut factory = DiscardSinkFactory::new();
                    let stats = Generator::new(schema)
                        .with_seed(42)
                        .run(&mut factory, &mut NoProgress)
                        .unwrap();
                    black_box(stats.total_rows)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark one value per generator kind
fn bench_generate_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_value");

    let specs = [
        ("hardcoded", GeneratorSpec::Hardcoded("fixed".into())),
        ("increment", GeneratorSpec::Increment),
        ("table_increment", GeneratorSpec::TableIncrement),
        ("random_10", GeneratorSpec::random(10, "", "")),
        ("random_64", GeneratorSpec::random(64, "p-", "-s")),
        ("predefined_list", GeneratorSpec::list(["a", "b", "c", "d"])),
    ];

    for (name, spec) in specs {
        let column = Column::new("c", spec);
        group.bench_function(name, |b| {
            let mut counters = CounterStore::new();
            let mut rng = seeded_rng(42);
            let mut row = 0u64;
            b.iter(|| {
                row += 1;
                let ctx = RowContext::root("t", row);
                black_box(generate_value(&column, &ctx, &mut counters, &mut rng))
            })
        });
    }

    group.finish();
}

/// Benchmark generation into CSV files
fn bench_generate_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_csv");
    group.sample_size(10);

    let scale = Scale::Medium;
    let schema = ecommerce_schema(scale);
    let total: u64 = scale.ecommerce_row_counts().iter().map(|(_, n)| n).sum();
    group.throughput(Throughput::Elements(total));

    group.bench_function("ecommerce_medium", |b| {
        let dir = TempDir::new().unwrap();
        b.iter(|| {
            let mut factory = CsvSinkFactory::new(dir.path());
            let stats = Generator::new(&schema)
                .with_seed(42)
                .run(&mut factory, &mut NoProgress)
                .unwrap();
            black_box(stats.total_rows)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_discard,
    bench_generate_value,
    bench_generate_csv
);
criterion_main!(benches);
