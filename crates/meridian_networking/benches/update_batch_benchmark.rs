//! # Update Batch Benchmark
//!
//! ARCHITECT'S REQUIREMENTS:
//! - 500 clients per tick, one batch each
//! - Packing and framing well under a millisecond per client
//!
//! Run with: `cargo bench --package meridian_networking`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meridian_networking::{compress_bound, Compressor, UpdateData, WorldPacket};
use meridian_shared::ObjectGuid;

/// A typical movement block.
const BLOCK_SIZE: usize = 64;

fn filled_batch(blocks: usize, out_of_range: u64) -> UpdateData {
    let mut data = UpdateData::new();
    data.add_out_of_range_guids((0..out_of_range).map(ObjectGuid::new));
    let block = [0x5Au8; BLOCK_SIZE];
    for _ in 0..blocks {
        data.add_update_block(&block);
    }
    data
}

/// Benchmark: queue blocks into segments.
fn bench_append_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_blocks");

    for count in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(filled_batch(count, 32)).packet_count());
        });
    }

    group.finish();
}

/// Benchmark: build and deliver a full batch.
fn bench_send_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("send_data");

    for count in [10, 500, 5_000] {
        let data = filled_batch(count, 32);
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let mut session: Vec<WorldPacket> = Vec::with_capacity(8);
                data.send_data(&mut session).map(|stats| stats.bytes_sent)
            });
        });
    }

    group.finish();
}

/// Benchmark: deflate one full-size payload at each level.
fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_30k");
    let source: Vec<u8> = (0..30_000u32).map(|i| (i % 251) as u8).collect();
    let mut dest = vec![0u8; compress_bound(source.len())];

    for level in [1, 6, 9] {
        let compressor = Compressor::new(level);
        group.bench_with_input(BenchmarkId::from_parameter(level), &compressor, |b, compressor| {
            b.iter(|| compressor.compress(black_box(&source), &mut dest));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append_blocks, bench_send_data, bench_compress);
criterion_main!(benches);
