//! Criterion benchmarks for the message categorizer.
//!
//! Covers the per-message hot path:
//! - Text normalization
//! - TF-IDF transformation
//! - End-to-end prediction

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use message_categorizer::analysis::analyzer::normalizer::TextNormalizer;
use message_categorizer::ml::{MessageCategorizer, RawRecord, TfIdfVectorizer, TrainingConfig};

/// Generate labeled support messages for benchmarking.
fn generate_records(count: usize) -> Vec<RawRecord> {
    let topics = [
        (
            "general",
            ["account", "password", "email", "profile", "username", "settings"],
        ),
        (
            "delivery",
            ["parcel", "courier", "tracking", "shipment", "delayed", "address"],
        ),
        (
            "payment",
            ["refund", "charged", "invoice", "card", "billing", "receipt"],
        ),
    ];

    (0..count)
        .map(|i| {
            let (category, words) = topics[i % topics.len()];
            let message = format!(
                "Hi team, my {} and {} have a problem since order #{}. {} please!",
                words[(i * 7) % words.len()],
                words[(i * 11 + 3) % words.len()],
                10_000 + i,
                words[(i * 13 + 1) % words.len()],
            );
            RawRecord::new(message, category)
        })
        .collect()
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    let normalizer = TextNormalizer::with_defaults().unwrap();
    let messages: Vec<String> = generate_records(1000)
        .into_iter()
        .filter_map(|r| r.message)
        .collect();

    group.bench_function("normalize_single", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&messages[0]))))
    });

    group.throughput(Throughput::Elements(messages.len() as u64));
    group.bench_function("normalize_batch", |b| {
        b.iter(|| black_box(normalizer.normalize_batch(black_box(&messages))))
    });

    group.finish();
}

fn bench_vectorization(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorization");

    let normalizer = TextNormalizer::with_defaults().unwrap();
    let messages: Vec<String> = generate_records(1000)
        .into_iter()
        .filter_map(|r| r.message)
        .collect();
    let cleaned = normalizer.normalize_batch(&messages).unwrap();

    group.sample_size(20);
    group.bench_function("fit", |b| {
        b.iter(|| black_box(TfIdfVectorizer::fit(black_box(&cleaned))))
    });

    let vectorizer = TfIdfVectorizer::fit(&cleaned).unwrap();
    group.bench_function("transform_single", |b| {
        b.iter(|| black_box(vectorizer.transform(black_box(&cleaned[0]))))
    });

    group.throughput(Throughput::Elements(cleaned.len() as u64));
    group.bench_function("transform_batch", |b| {
        b.iter(|| black_box(vectorizer.transform_batch(black_box(&cleaned))))
    });

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let (categorizer, _) =
        MessageCategorizer::train(generate_records(600), &TrainingConfig::default()).unwrap();
    let queries: Vec<String> = generate_records(100)
        .into_iter()
        .filter_map(|r| r.message)
        .collect();

    group.bench_function("predict_single", |b| {
        b.iter(|| black_box(categorizer.predict(black_box(&queries[0]))))
    });

    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("predict_batch", |b| {
        b.iter(|| black_box(categorizer.predict_batch(black_box(&queries))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalization,
    bench_vectorization,
    bench_prediction
);
criterion_main!(benches);
