//! Performance benchmarks for the resumable upload client
//!
//! This benchmark suite measures the CPU-side work done per chunk: planning,
//! query string construction and multipart encoding. Network time is not
//! measured.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use resumable_upload::{planner, protocol, UploadSession, DEFAULT_CHUNK_SIZE, MB};

/// Benchmark for planning the chunks of files of various sizes
fn bench_plan_chunks(c: &mut Criterion) {
    for size in [0, 12 * MB, 1024 * MB] {
        c.bench_with_input(BenchmarkId::new("plan_chunks", size), &size, |b, &size| {
            b.iter(|| planner::plan(black_box(size), DEFAULT_CHUNK_SIZE));
        });
    }
}

/// Benchmark for building the probe and upload URLs of one chunk
fn bench_query_encoding(c: &mut Criterion) {
    let session = UploadSession::new("benchmark-file.bin", 12 * MB, DEFAULT_CHUNK_SIZE);
    let url = "https://uploads.example.com/api/v1/upload";

    c.bench_function("probe_url", |b| {
        b.iter(|| protocol::add_query_to_url(black_box(url), &protocol::probe_query(&session, 2)));
    });

    c.bench_function("upload_url", |b| {
        b.iter(|| protocol::add_query_to_url(black_box(url), &protocol::upload_query(&session, 2)));
    });
}

/// Benchmark for wrapping chunks in a multipart envelope
///
/// The largest input matches the default chunk size.
fn bench_multipart_encoding(c: &mut Criterion) {
    let boundary = protocol::generate_boundary();

    for size in [1024usize, 64 * 1024, DEFAULT_CHUNK_SIZE as usize] {
        let data = vec![0u8; size];

        c.bench_with_input(
            BenchmarkId::new("encode_multipart", size),
            &data,
            |b, data| {
                b.iter(|| {
                    protocol::encode_multipart(&boundary, "benchmark-file.bin", black_box(data))
                        .unwrap()
                });
            },
        );
    }
}

criterion_group!(
    benches,
    bench_plan_chunks,
    bench_query_encoding,
    bench_multipart_encoding
);
criterion_main!(benches);
