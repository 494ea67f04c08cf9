//! Full-pipeline benchmark over a synthetic ledger.

use criterion::{criterion_group, criterion_main, Criterion};
use ledgerscope::engine::{AnalyzeOptions, ForensicsEngine};
use ledgerscope_core::record::{AmountField, RawRecord};

fn record(sender: String, receiver: String, amount: f64, timestamp: String) -> RawRecord {
    RawRecord {
        transaction_id: None,
        sender_id: Some(sender),
        receiver_id: Some(receiver),
        amount: Some(AmountField::Number(amount)),
        timestamp: Some(timestamp),
    }
}

/// Deterministic mixed workload: background traffic, a few smurfing sinks,
/// cycles, and a shell chain.
fn fixture(transactions: usize) -> Vec<RawRecord> {
    let mut records = Vec::with_capacity(transactions + 64);

    for i in 0..transactions {
        let day = 1 + (i / 480) % 28;
        let hour = (i * 7) % 24;
        let minute = (i * 13) % 60;
        records.push(record(
            format!("ACCT_{:04}", (i * 17) % 900),
            format!("ACCT_{:04}", (i * 31 + 7) % 900),
            50.0 + (i % 200) as f64,
            format!("2026-01-{day:02} {hour:02}:{minute:02}:00"),
        ));
    }

    // A fan-in sink.
    for i in 0..30 {
        records.push(record(
            format!("MULE_{i:02}"),
            "SINK_0001".to_string(),
            95.0,
            format!("2026-01-05 {:02}:15:00", i % 24),
        ));
    }
    // A triangle and a shell chain.
    for (i, (s, r)) in [
        ("CYC_A", "CYC_B"),
        ("CYC_B", "CYC_C"),
        ("CYC_C", "CYC_A"),
        ("SH_0", "SH_1"),
        ("SH_1", "SH_2"),
        ("SH_2", "SH_3"),
        ("SH_3", "SH_4"),
    ]
    .iter()
    .enumerate()
    {
        records.push(record(
            (*s).to_string(),
            (*r).to_string(),
            4000.0,
            format!("2026-01-07 {:02}:00:00", 9 + i),
        ));
    }
    records
}

fn bench_pipeline(c: &mut Criterion) {
    let engine = ForensicsEngine::default();
    let records = fixture(2_000);

    c.bench_function("analyze_2k_records", |b| {
        b.iter(|| {
            engine
                .analyze(records.clone(), &AnalyzeOptions::default())
                .expect("analysis succeeds")
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
