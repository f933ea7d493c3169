use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use repay_core::core::collation::Collation;
use repay_core::core::services::{SortField, SortOrder, SummaryService};
use repay_core::domain::Payment;
use repay_core::storage::{FileStore, RecordStore};
use tempfile::tempdir;

const MERCHANTS: [&str; 6] = ["Biedronka", "apteka", "Żabka", "Lidl", "kiosk", "Rossmann"];

fn build_sample_payments(count: usize) -> Vec<Payment> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx % 365) as i64);
            let payment = Payment::new(
                date.format("%Y-%m-%d").to_string(),
                MERCHANTS[idx % MERCHANTS.len()],
                1.0 + (idx % 250) as f64 * 0.37,
                stamp,
            );
            if idx % 4 == 0 {
                payment.with_notes("weekly shopping")
            } else {
                payment
            }
        })
        .collect()
}

fn bench_filter_sort(c: &mut Criterion) {
    let payments = build_sample_payments(black_box(10_000));

    c.bench_function("sort_by_date_10k", |b| {
        b.iter(|| {
            SummaryService::filter_and_sort(
                &payments,
                "",
                SortField::Date,
                SortOrder::Desc,
                Collation::Root,
            )
        })
    });

    c.bench_function("sort_by_merchant_polish_10k", |b| {
        b.iter(|| {
            SummaryService::filter_and_sort(
                &payments,
                "",
                SortField::Merchant,
                SortOrder::Asc,
                Collation::Polish,
            )
        })
    });
}

fn bench_store_append(c: &mut Criterion) {
    let payments = build_sample_payments(5_000);
    let dir = tempdir().expect("tempdir");
    let files = FileStore::new(dir.path().join("data")).expect("file store");
    let store = RecordStore::new(Arc::new(files));

    c.bench_function("add_payment_onto_5k", |b| {
        b.iter_batched(
            || {
                store.save_payments(&payments).expect("seed payments");
                payments[0].clone()
            },
            |payment| store.add_payment(payment).expect("append payment"),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_filter_sort, bench_store_append);
criterion_main!(benches);
