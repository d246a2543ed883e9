//! Stream and primitive I/O benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gametable_bench::cinematic_table;
use gametable_codec::{write_table, ByteWriter, ReadExt};
use gametable_stream::{ByteStream, FileStream, MemoryStream};
use gametable_tables::cinematic_tree;
use tempfile::TempDir;

/// Benchmark little-endian scalar reads from memory.
fn bench_read_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_scalars");

    for count in [64, 1024, 16384].iter() {
        let mut writer = ByteWriter::with_capacity(count * 4);
        for i in 0..*count {
            writer.write_u32(i as u32);
        }
        let data = writer.into_bytes();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let mut stream = MemoryStream::with_data(data.clone());
                let mut sum = 0u64;
                for _ in 0..count {
                    sum += u64::from(stream.read_u32().unwrap());
                }
                black_box(sum);
            });
        });
    }

    group.finish();
}

/// Benchmark scalar writes into a staging buffer.
fn bench_write_scalars(c: &mut Criterion) {
    c.bench_function("write_scalars_1024", |b| {
        b.iter(|| {
            let mut writer = ByteWriter::with_capacity(1024 * 8);
            for i in 0..1024 {
                writer.write_i32(black_box(i));
                writer.write_f32(black_box(i as f32));
            }
            black_box(writer.into_bytes());
        });
    });
}

/// Benchmark writing a table to a file.
fn bench_file_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_write");
    group.sample_size(20);
    let tree = cinematic_tree().unwrap();

    for count in [16, 256].iter() {
        let data = cinematic_table(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("bench.bin");
            b.iter(|| {
                let mut stream = FileStream::create(&path).unwrap();
                write_table(&mut stream, &tree, black_box(data)).unwrap();
                black_box(stream.position());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_read_scalars,
    bench_write_scalars,
    bench_file_write,
);

criterion_main!(benches);
