//! Per-stage LZW benchmarks.
//!
//! - `transform`: single-block encode/decode with no threads, to isolate
//!   the dictionary cost.
//! - `tree`: full encode/decode runs across thread counts, to show how
//!   forking scales.
//!
//! All groups enforce warm_up_time(2s) + measurement_time(5s) + sample_size(10)
//! to keep total runtime bounded.


use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pzw::dictionary::{DecodeDictionary, Dictionary, EncodeDictionary};
use pzw::pipeline::{self, EncodeOptions};
use pzw::transform;
use stages_common::{cap, get_test_data, SIZES_ALL, SIZES_SMALL, THREADS};

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    cap(&mut group);
    for &size in SIZES_ALL {
        let data = get_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| transform::encode_block(data, &mut EncodeDictionary::alphabet()));
        });

        let codes = transform::encode_block(&data, &mut EncodeDictionary::alphabet());
        group.bench_with_input(BenchmarkId::new("decode", size), &codes, |b, codes| {
            b.iter(|| transform::decode_block(codes, &mut DecodeDictionary::alphabet()).unwrap());
        });
    }
    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");
    cap(&mut group);
    let size = SIZES_ALL[SIZES_ALL.len() - 1];
    let data = get_test_data(size);
    group.throughput(Throughput::Bytes(size as u64));

    for &threads in THREADS {
        let options = EncodeOptions { threads };
        group.bench_with_input(BenchmarkId::new("encode", threads), &data, |b, data| {
            b.iter(|| pipeline::encode(data, &options).unwrap());
        });

        let encoded = pipeline::encode(&data, &options).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", threads), &encoded, |b, enc| {
            b.iter(|| pipeline::decode(enc).unwrap());
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    cap(&mut group);
    for &size in SIZES_SMALL {
        let data = get_test_data(size);
        let encoded = pipeline::encode(&data, &EncodeOptions { threads: 4 }).unwrap();
        let text = encoded.to_bytes();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("write", size), &encoded, |b, enc| {
            b.iter(|| enc.to_bytes());
        });
        group.bench_with_input(BenchmarkId::new("read", size), &text, |b, text| {
            b.iter(|| pzw::format::EncodedFile::from_bytes(text).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform, bench_tree, bench_format);
criterion_main!(benches);
