//! # Codec Throughput Benchmark
//!
//! Targets:
//! - Packed uint write + read well under 10ns per value
//! - Model rebuild from statistics under 50µs
//!
//! Run with: `cargo bench --package tickpack_codec`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tickpack_codec::huffman::build_code_lengths;
use tickpack_codec::{
    HuffmanReader, HuffmanWriter, Model, RawWriter, StreamReader, StreamWriter, SymbolStatistics,
    MAX_CODE_LENGTH,
};

/// Values per benchmark iteration.
const VALUE_COUNT: usize = 10_000;

/// Small deltas dominate real snapshot traffic.
fn sample_values(seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..VALUE_COUNT)
        .map(|_| {
            let bits: u32 = rng.gen_range(0..=20);
            rng.gen::<u32>() >> (32 - bits.max(1))
        })
        .collect()
}

fn bench_packed_uint_write(c: &mut Criterion) {
    let model = Model::default();
    let values = sample_values(1);
    let mut buffer = vec![0u8; VALUE_COUNT * 5];

    let mut group = c.benchmark_group("packed_uint_write");
    group.throughput(Throughput::Elements(VALUE_COUNT as u64));

    group.bench_function("huffman", |b| {
        b.iter(|| {
            let mut writer = HuffmanWriter::new(&model, &mut buffer);
            for &v in &values {
                writer.write_packed_uint(black_box(v), 0);
            }
            writer.flush()
        });
    });

    group.bench_function("raw", |b| {
        b.iter(|| {
            let mut writer = RawWriter::new(&mut buffer);
            for &v in &values {
                writer.write_packed_uint(black_box(v), 0);
            }
            writer.flush()
        });
    });

    group.finish();
}

fn bench_packed_uint_read(c: &mut Criterion) {
    let model = Model::default();
    let values = sample_values(2);
    let mut buffer = vec![0u8; VALUE_COUNT * 5];
    let len = {
        let mut writer = HuffmanWriter::new(&model, &mut buffer);
        for &v in &values {
            writer.write_packed_uint(v, 0);
        }
        writer.flush()
    };
    let packet = &buffer[..len];

    let mut group = c.benchmark_group("packed_uint_read");
    group.throughput(Throughput::Elements(VALUE_COUNT as u64));

    group.bench_function("huffman", |b| {
        b.iter(|| {
            let mut reader = HuffmanReader::new(&model, black_box(packet));
            let mut sum = 0u64;
            for _ in 0..VALUE_COUNT {
                sum += u64::from(reader.read_packed_uint(0));
            }
            sum
        });
    });

    group.finish();
}

fn bench_model_construction(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut group = c.benchmark_group("model_construction");

    for contexts in [1usize, 16, 64] {
        let mut statistics = SymbolStatistics::new(contexts);
        for context in 0..contexts {
            for _ in 0..1000 {
                statistics.record_uint(context, rng.gen_range(0..100_000));
            }
        }
        group.bench_with_input(BenchmarkId::from_parameter(contexts), &statistics, |b, stats| {
            b.iter(|| Model::from_statistics(black_box(stats)));
        });
    }

    let frequencies: Vec<u64> = (0..256).map(|_| rng.gen_range(1..10_000)).collect();
    group.bench_function("package_merge_256", |b| {
        b.iter(|| build_code_lengths(black_box(&frequencies), black_box(MAX_CODE_LENGTH + 6)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_packed_uint_write,
    bench_packed_uint_read,
    bench_model_construction,
);

criterion_main!(benches);
