//! Benchmark – checked vs. unchecked `packet::Reader`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use packet::{Reader, UncheckedReader, Writer};

const RECORD_LEN: usize = 4 + 4 + 1 + 1;

/// Encode `count` records shaped like `{ a: u32, b: u32, c: u8, d: u8 }`.
fn make_records(count: usize) -> Vec<u8> {
    let mut writer = Writer::with_capacity(count * RECORD_LEN);
    for i in 0..count {
        writer.write_uint32(i as u32);
        writer.write_uint32((i * 7) as u32);
        writer.write_uint8(i as u8);
        writer.write_uint8((i >> 8) as u8);
    }
    writer.into_inner()
}

fn sum_checked(bytes: &[u8]) -> packet::Result<u64> {
    let mut reader = Reader::new(bytes);
    let mut sum = 0u64;
    while reader.remaining() > 0 {
        sum += u64::from(reader.read_uint32()?);
        sum += u64::from(reader.read_uint32()?);
        sum += u64::from(reader.read_uint8()?);
        sum += u64::from(reader.read_uint8()?);
    }
    Ok(sum)
}

fn sum_unchecked(bytes: &[u8]) -> u64 {
    let mut reader = UncheckedReader::new_unchecked(bytes);
    let mut sum = 0u64;
    while reader.remaining() >= RECORD_LEN {
        sum += u64::from(reader.read_uint32());
        sum += u64::from(reader.read_uint32());
        sum += u64::from(reader.read_uint8());
        sum += u64::from(reader.read_uint8());
    }
    sum
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_records");
    for &count in &[1_000usize, 100_000] {
        let bytes = make_records(count);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("checked", count), &bytes, |b, bytes| {
            b.iter(|| black_box(sum_checked(black_box(bytes))));
        });
        group.bench_with_input(BenchmarkId::new("unchecked", count), &bytes, |b, bytes| {
            b.iter(|| black_box(sum_unchecked(black_box(bytes))));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_records }
criterion_main!(benches);
