//! Codec throughput: encoding and decoding a catalog of skill records.
//!
//! Run with:
//!   cargo bench -p toon-codec

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use toon_codec::{decode, encode_with, Document, EncodeOptions, Row, Scalar, ToonValue};

fn record(i: usize) -> Document {
    let steps: Vec<Row> = (1..=4i64)
        .map(|n| {
            [
                ("n", Scalar::Integer(n)),
                ("action", Scalar::from(format!("step {n} of skill {i}"))),
            ]
            .into_iter()
            .collect()
        })
        .collect();

    let mut doc = Document::new();
    doc.insert("name", ToonValue::from(format!("skill-{i}")));
    doc.insert("category", ToonValue::from("engineering"));
    doc.insert(
        "description",
        ToonValue::from("Review code for correctness. Use when a pull request needs a second pass."),
    );
    doc.insert(
        "tags",
        ToonValue::List(vec![Scalar::from("review"), Scalar::from("quality")]),
    );
    doc.insert(
        "allowed_tools",
        ToonValue::List(vec![Scalar::from("Read"), Scalar::from("Grep")]),
    );
    doc.insert("steps", ToonValue::Table(steps));
    doc
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for style in ["full", "abbreviated"] {
        let options = if style == "full" {
            EncodeOptions::default()
        } else {
            EncodeOptions::abbreviated()
        };
        let docs: Vec<Document> = (0..100).map(record).collect();
        let encoded: Vec<String> = docs
            .iter()
            .map(|d| encode_with(d, &options).unwrap())
            .collect();

        group.bench_with_input(BenchmarkId::new("encode", style), &docs, |b, docs| {
            b.iter(|| {
                for doc in docs {
                    black_box(encode_with(black_box(doc), &options).unwrap());
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("decode", style), &encoded, |b, encoded| {
            b.iter(|| {
                for toon in encoded {
                    black_box(decode(black_box(toon)).unwrap());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
