//! hash benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use screp::crypto::{hash_string, hash_type};

fn bench_hash_string_short(c: &mut Criterion) {
    let name = "replay.details";

    c.bench_function("hash_string_short", |b| {
        b.iter(|| hash_string(black_box(name), black_box(hash_type::TABLE_INDEX)));
    });
}

fn bench_hash_string_long(c: &mut Criterion) {
    let name = "folder1\\folder2\\folder3\\folder4\\replay.tracker.events";

    c.bench_function("hash_string_long", |b| {
        b.iter(|| hash_string(black_box(name), black_box(hash_type::TABLE_INDEX)));
    });
}

fn bench_hash_all_types(c: &mut Criterion) {
    let name = "(attributes)";

    c.bench_function("hash_all_types", |b| {
        b.iter(|| {
            let h0 = hash_string(name, hash_type::TABLE_INDEX);
            let h1 = hash_string(name, hash_type::NAME_A);
            let h2 = hash_string(name, hash_type::NAME_B);
            let h3 = hash_string(name, hash_type::FILE_KEY);
            black_box((h0, h1, h2, h3));
        });
    });
}

fn bench_hash_case_and_separator_conversion(c: &mut Criterion) {
    let name = "Replay.Game.Events";

    c.bench_function("hash_case_and_separator_conversion", |b| {
        b.iter(|| hash_string(black_box(name), black_box(hash_type::NAME_A)));
    });
}

criterion_group!(
    benches,
    bench_hash_string_short,
    bench_hash_string_long,
    bench_hash_all_types,
    bench_hash_case_and_separator_conversion,
);
criterion_main!(benches);
