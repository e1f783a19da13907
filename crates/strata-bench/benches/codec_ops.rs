//! Criterion micro-benchmarks for the wire codec.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_transport::codec::{decode_frame, encode_frame};
use strata_transport::{Message, Tag};

/// A payload the size of one reference block: 12 rows of 100 columns.
fn block_payload() -> Message {
    Message::Cells((0..1200).map(|i| i as f64 * 0.25).collect())
}

fn bench_encode_payload(c: &mut Criterion) {
    let message = block_payload();

    c.bench_function("codec_encode_payload_1200", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(16 * 1024);
            encode_frame(&mut buf, Tag::Payload, &message).unwrap();
            black_box(&buf);
        });
    });
}

fn bench_decode_payload(c: &mut Criterion) {
    let mut encoded = Vec::new();
    encode_frame(&mut encoded, Tag::Payload, &block_payload()).unwrap();

    c.bench_function("codec_decode_payload_1200", |b| {
        b.iter(|| {
            let mut reader = encoded.as_slice();
            let frame = decode_frame(&mut reader).unwrap();
            black_box(&frame);
        });
    });
}

criterion_group!(benches, bench_encode_payload, bench_decode_payload);
criterion_main!(benches);
