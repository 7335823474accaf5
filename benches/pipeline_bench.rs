use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tally::nlp::{DateRangeParser, EntityExtractor, IntentClassifier};
use tally::pipeline::QueryPipeline;
use tally::store::{Ledger, Transaction};

const QUERIES: [&str; 5] = [
    "how much did i spend on food last month",
    "show my transactions above 500 last week",
    "compare my spending this month vs last month",
    "highest spending category this year",
    "average spending on coffee since july",
];

fn synthetic_ledger(rows: usize) -> Ledger {
    let categories = ["food", "cafe", "grocery", "transport", "rent"];
    let merchants = ["swiggy", "starbucks", "bigbasket", "uber", "landlord"];
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let transactions = (0..rows)
        .map(|i| Transaction {
            date: base + Duration::days((i % 365) as i64),
            amount: 50 + (i as i64 * 37) % 2000,
            category: categories[i % categories.len()].to_string(),
            merchant: merchants[i % merchants.len()].to_string(),
        })
        .collect();

    Ledger::from_transactions(transactions)
}

fn bench_classify(c: &mut Criterion) {
    let classifier = IntentClassifier::new();
    c.bench_function("classify", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(classifier.classify(black_box(query)));
            }
        });
    });
}

fn bench_extract(c: &mut Criterion) {
    let extractor = EntityExtractor::new();
    c.bench_function("extract", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(extractor.extract(black_box(query)));
            }
        });
    });
}

fn bench_parse_dates(c: &mut Criterion) {
    let parser = DateRangeParser::new();
    let now = NaiveDate::from_ymd_opt(2025, 9, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    c.bench_function("parse_dates", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(parser.parse(black_box(query), now));
            }
        });
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let now = NaiveDate::from_ymd_opt(2025, 9, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let mut group = c.benchmark_group("pipeline");
    for rows in [1_000, 10_000] {
        let pipeline = QueryPipeline::new(synthetic_ledger(rows));
        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| {
                for query in QUERIES {
                    black_box(pipeline.run_at(black_box(query), now, Some(20)).unwrap());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_extract,
    bench_parse_dates,
    bench_pipeline
);
criterion_main!(benches);
