//! bit cursor benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use screp::bit_reader::{BitCursor, BitOrder};

fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 37 + 11) as u8).collect()
}

fn bench_read_bits_msb(c: &mut Criterion) {
    let data = sample_data(4096);

    c.bench_function("read_bits_msb_6_at_a_time", |b| {
        b.iter(|| {
            let mut cursor = BitCursor::new(black_box(&data), BitOrder::Msb);
            while !cursor.done() {
                let _ = cursor.read_bits(6);
            }
        });
    });
}

fn bench_read_bits_lsb(c: &mut Criterion) {
    let data = sample_data(4096);

    c.bench_function("read_bits_lsb_6_at_a_time", |b| {
        b.iter(|| {
            let mut cursor = BitCursor::new(black_box(&data), BitOrder::Lsb);
            while !cursor.done() {
                let _ = cursor.read_bits(6);
            }
        });
    });
}

fn bench_read_aligned_bytes(c: &mut Criterion) {
    let data = sample_data(4096);

    c.bench_function("read_aligned_bytes_4_at_a_time", |b| {
        b.iter(|| {
            let mut cursor = BitCursor::new(black_box(&data), BitOrder::Msb);
            while !cursor.done() {
                let _ = cursor.read_aligned_bytes(4);
            }
        });
    });
}

fn bench_byte_align_after_odd_bit_reads(c: &mut Criterion) {
    let data = sample_data(4096);

    c.bench_function("byte_align_after_odd_bit_reads", |b| {
        b.iter(|| {
            let mut cursor = BitCursor::new(black_box(&data), BitOrder::Msb);
            while !cursor.done() {
                let _ = cursor.read_bits(3);
                cursor.byte_align();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_read_bits_msb,
    bench_read_bits_lsb,
    bench_read_aligned_bytes,
    bench_byte_align_after_odd_bit_reads,
);
criterion_main!(benches);
