//! Benchmarks for the diff engine and the dump codecs.
//!
//! Run with: cargo bench --bench diff_benchmark

use abi_tools::diff::{DiffEngine, FunctionMatching};
use abi_tools::dump::{deserialize, serialize};
use abi_tools::model::{
    AbiRepresentation, AbiRepresentationBuilder, EnumType, FunctionDecl, GlobalVarDecl,
    RecordKind, RecordType, TypeReference,
};
use abi_tools::DumpFormat;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// A library of `count` records, enums, functions and globals. Every tenth
/// entity differs between `revision` 0 and 1.
fn generate_abi(count: usize, revision: u64) -> AbiRepresentation {
    let mut builder = AbiRepresentationBuilder::new();

    for i in 0..count {
        let changed = revision > 0 && i % 10 == 0;

        let fields = if changed { 5 } else { 4 };
        let mut record = RecordType::new(format!("lib::Record{i}"), RecordKind::Struct, 32 * fields, 32);
        for f in 0..fields {
            record = record.with_field(&format!("field{f}"), TypeReference::named("int"), 32 * f);
        }
        builder.add_record(record).unwrap();

        let mut enumeration = EnumType::new(format!("lib::Enum{i}"));
        for v in 0..8 {
            let value = if changed && v == 7 { 100 } else { v };
            enumeration = enumeration.with(&format!("E{i}_V{v}"), value);
        }
        builder.add_enum(enumeration).unwrap();

        let param = if changed { "long" } else { "int" };
        builder
            .add_function(FunctionDecl::new(
                format!("lib_fn_{i}"),
                TypeReference::named("int"),
                vec![TypeReference::named(format!("lib::Record{i}")).pointer(), TypeReference::named(param)],
            ))
            .unwrap();

        builder
            .add_global_var(GlobalVarDecl::new(format!("lib_global_{i}"), TypeReference::named("double")))
            .unwrap();
    }

    builder.build().unwrap()
}

fn bench_diff_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_by_size");

    for size in [100, 1_000, 5_000] {
        let old = generate_abi(size, 0);
        let new = generate_abi(size, 1);
        let engine = DiffEngine::new();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(engine.compare(black_box(&old), black_box(&new))));
        });
    }

    group.finish();
}

fn bench_parallel_vs_sequential(c: &mut Criterion) {
    let old = generate_abi(2_000, 0);
    let new = generate_abi(2_000, 1);
    let mut group = c.benchmark_group("diff_concurrency");

    for parallel in [true, false] {
        let engine = DiffEngine::new().parallel(parallel);
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| black_box(engine.compare(black_box(&old), black_box(&new))));
        });
    }

    group.finish();
}

fn bench_function_matching(c: &mut Criterion) {
    let old = generate_abi(2_000, 0);
    let new = generate_abi(2_000, 1);
    let engine = DiffEngine::new().with_function_matching(FunctionMatching::ByName);

    c.bench_function("diff_2000_by_name", |b| {
        b.iter(|| black_box(engine.compare(black_box(&old), black_box(&new))));
    });
}

fn bench_dump_codecs(c: &mut Criterion) {
    let repr = generate_abi(1_000, 0);
    let mut group = c.benchmark_group("dump_codecs");

    for format in [DumpFormat::Json, DumpFormat::Yaml, DumpFormat::Binary] {
        let bytes = serialize(&repr, format).unwrap();
        group.bench_with_input(BenchmarkId::new("serialize", format), &format, |b, format| {
            b.iter(|| black_box(serialize(black_box(&repr), *format)));
        });
        group.bench_with_input(BenchmarkId::new("deserialize", format), &bytes, |b, bytes| {
            b.iter(|| black_box(deserialize(black_box(bytes))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_diff_sizes,
    bench_parallel_vs_sequential,
    bench_function_matching,
    bench_dump_codecs
);
criterion_main!(benches);
