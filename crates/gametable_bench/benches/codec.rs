//! Table codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gametable_bench::{cinematic_table, conversation_table};
use gametable_codec::{from_bytes, to_bytes, CodecConfig, TableCodec, TableReader};
use gametable_stream::MemoryStream;
use gametable_tables::{cinematic_tree, conversation_tree, CinematicData, ConversationData};

/// Benchmark encoding cinematic tables of growing size.
fn bench_encode_cinematic(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_cinematic");
    let tree = cinematic_tree().unwrap();

    for count in [1, 16, 256, 1024].iter() {
        let data = cinematic_table(*count);
        let len = to_bytes(&tree, &data).unwrap().len();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let result = to_bytes(&tree, black_box(data)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark decoding cinematic tables of growing size.
fn bench_decode_cinematic(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_cinematic");
    let tree = cinematic_tree().unwrap();

    for count in [1, 16, 256, 1024].iter() {
        let encoded = to_bytes(&tree, &cinematic_table(*count)).unwrap();
        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &encoded, |b, encoded| {
            b.iter(|| {
                let result: CinematicData = from_bytes(&tree, black_box(encoded)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark conversations, which nest lists inside list elements.
fn bench_conversation(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversation");
    let tree = conversation_tree().unwrap();

    for frames in [8, 128, 1024].iter() {
        let data = conversation_table(*frames);
        let encoded = to_bytes(&tree, &data).unwrap();
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", frames), &data, |b, data| {
            b.iter(|| {
                let result = to_bytes(&tree, black_box(data)).unwrap();
                black_box(result);
            });
        });

        group.bench_with_input(BenchmarkId::new("decode", frames), &encoded, |b, encoded| {
            b.iter(|| {
                let result: ConversationData = from_bytes(&tree, black_box(encoded)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark roundtrip (encode + decode).
fn bench_roundtrip(c: &mut Criterion) {
    let tree = conversation_tree().unwrap();
    let data = conversation_table(64);

    c.bench_function("roundtrip_conversation_64", |b| {
        b.iter(|| {
            let encoded = to_bytes(&tree, black_box(&data)).unwrap();
            let decoded: ConversationData = from_bytes(&tree, &encoded).unwrap();
            black_box(decoded);
        });
    });
}

/// Benchmark strict terminator checking against the default reader.
fn bench_strict_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_config");
    let tree = cinematic_tree().unwrap();
    let encoded = to_bytes(&tree, &cinematic_table(256)).unwrap();

    for (name, config) in [
        ("default", CodecConfig::new()),
        ("strict", CodecConfig::new().strict_terminators(true)),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut stream = MemoryStream::with_data(encoded.clone());
                let mut reader = TableReader::new(&mut stream, config).unwrap();
                let result = reader.read_record(tree.root()).unwrap();
                black_box(result);
            });
        });
    }

    group.bench_function("codec_default", |b| {
        let codec = TableCodec::default();
        b.iter(|| {
            let mut stream = MemoryStream::with_data(encoded.clone());
            let result: CinematicData = codec.read(&mut stream, &tree).unwrap();
            black_box(result);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_cinematic,
    bench_decode_cinematic,
    bench_conversation,
    bench_roundtrip,
    bench_strict_reader,
);

criterion_main!(benches);
