//! Integration tests for the full analysis pipeline.
//!
//! Each scenario drives the engine end-to-end through raw records and
//! checks the published result bundle.

use ledgerscope::engine::{AnalyzeOptions, ForensicsEngine};
use ledgerscope::prelude::*;
use ledgerscope_core::record::{AmountField, RawRecord};

fn record(sender: &str, receiver: &str, amount: f64, timestamp: &str) -> RawRecord {
    RawRecord {
        transaction_id: None,
        sender_id: Some(sender.to_string()),
        receiver_id: Some(receiver.to_string()),
        amount: Some(AmountField::Number(amount)),
        timestamp: Some(timestamp.to_string()),
    }
}

fn analyze(records: Vec<RawRecord>) -> AnalysisReport {
    ForensicsEngine::default()
        .analyze(records, &AnalyzeOptions::default())
        .expect("analysis succeeds")
}

fn row<'a>(report: &'a AnalysisReport, account: &str) -> Option<&'a SuspiciousAccount> {
    report
        .suspicious_accounts
        .iter()
        .find(|a| a.account_id == account)
}

// ============================================================================
// Scenario: triangle cycle
// ============================================================================

#[test]
fn test_triangle_cycle() {
    let report = analyze(vec![
        record("A", "B", 1000.0, "2026-01-10 10:00:00"),
        record("B", "C", 1000.0, "2026-01-10 11:00:00"),
        record("C", "A", 1000.0, "2026-01-10 12:00:00"),
    ]);

    assert_eq!(report.suspicious_accounts.len(), 3);
    for account in ["A", "B", "C"] {
        let row = row(&report, account).expect(account);
        assert_eq!(row.suspicion_score, 75.0);
        assert_eq!(row.detected_patterns, vec!["cycle_length_3"]);
        assert_eq!(row.ring_id.as_deref(), Some("RING_001"));
    }

    assert_eq!(report.fraud_rings.len(), 1);
    let ring = &report.fraud_rings[0];
    assert_eq!(ring.member_accounts, vec!["A", "B", "C"]);
    assert_eq!(ring.pattern_type, "cycle");
    assert_eq!(ring.risk_score, 75.0);

    assert_eq!(report.summary.total_accounts_analyzed, 3);
    assert_eq!(report.summary.total_transactions, 3);
    assert_eq!(report.summary.fraud_rings_detected, 1);
}

// ============================================================================
// Scenario: fan-in sink
// ============================================================================

#[test]
fn test_fan_in_sink_not_suppressed_by_hub_rule() {
    // Fifty distinct senders inside one 24-hour day. The hub rule sees the
    // sender count but single-day concentration can never look stable.
    let records: Vec<RawRecord> = (0..50)
        .map(|i| {
            record(
                &format!("S{i:02}"),
                "SINK",
                100.0,
                &format!("2026-01-10 {:02}:{:02}:00", (i * 20) / 60, (i * 20) % 60),
            )
        })
        .collect();

    let report = analyze(records);

    let sink = row(&report, "SINK").expect("sink flagged");
    assert_eq!(sink.suspicion_score, 40.0);
    assert_eq!(sink.detected_patterns, vec!["fan_in"]);
    assert!(!sink.is_legitimate_hub);

    // Lone flagged account: no ring.
    assert!(report.fraud_rings.is_empty());
    assert!(sink.ring_id.is_none());

    // Projection: the sink plus its fifty senders.
    assert_eq!(report.graph_data.nodes.len(), 51);
}

// ============================================================================
// Scenario: stable merchant
// ============================================================================

fn merchant_records(merchant: &str, days: u32, senders: u32, month: u32) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for day in 1..=days {
        // Deterministic daily volume within [85, 115].
        let volume = 85 + (day * 7) % 31;
        for i in 0..volume {
            let sender = format!("{merchant}_C{:03}", (day * 113 + i) % senders);
            let hour = 5 + (i % 17); // business hours only
            records.push(record(
                &sender,
                merchant,
                25.0,
                &format!("2026-{month:02}-{day:02} {hour:02}:{:02}:00", i % 60),
            ));
        }
    }
    records
}

#[test]
fn test_stable_merchant_is_exempt() {
    let report = analyze(merchant_records("MEGAMART", 30, 200, 3));

    // The merchant would trip fan-in hard, but the hub rule suppresses it
    // and nothing else in the data is suspicious.
    assert!(row(&report, "MEGAMART").is_none());
    assert!(report.suspicious_accounts.is_empty());
    assert_eq!(report.summary.suspicious_accounts_flagged, 0);
    assert_eq!(report.summary.avg_risk_score, 0.0);
}

#[test]
fn test_legitimate_neighbor_visible_in_projection() {
    // A stable merchant that also once paid into a smurfing sink: the
    // merchant must never get a result row, but it may appear in the
    // projected graph as a neighbor, marked legitimate.
    let mut records = merchant_records("MEGAMART", 10, 60, 4);
    records.push(record("MEGAMART", "SINK", 500.0, "2026-04-05 10:00:00"));
    for i in 0..11 {
        records.push(record(
            &format!("MULE{i:02}"),
            "SINK",
            90.0,
            &format!("2026-04-05 {:02}:30:00", 8 + i),
        ));
    }

    let report = analyze(records);

    assert!(row(&report, "MEGAMART").is_none());
    let sink = row(&report, "SINK").expect("sink flagged");
    assert!(sink.detected_patterns.contains(&"fan_in".to_string()));

    let merchant_node = report
        .graph_data
        .nodes
        .iter()
        .find(|n| n.id == "MEGAMART")
        .expect("merchant appears as neighbor");
    assert!(merchant_node.is_legitimate);
    assert_eq!(merchant_node.risk_score, 0.0);
    assert!(merchant_node.tags.is_empty());
}

// ============================================================================
// Scenario: burst + nocturnal
// ============================================================================

#[test]
fn test_burst_and_nocturnal_accumulate() {
    // Fifty sends within fifty minutes, deep at night, to five receivers.
    let records: Vec<RawRecord> = (0..50)
        .map(|i| {
            record(
                "B",
                &format!("R{}", i % 5),
                75.0,
                &format!("2026-01-10 01:{i:02}:00"),
            )
        })
        .collect();

    let report = analyze(records);

    let b = row(&report, "B").expect("burst account flagged");
    assert_eq!(b.suspicion_score, 40.0); // 15 burst + 25 nocturnal
    assert_eq!(
        b.detected_patterns,
        vec!["high_velocity", "nocturnal_activity"]
    );
    assert!(b.explanation.contains("burst"));
    assert!(b.explanation.contains("nocturnal"));
    assert_eq!(b.recent_transactions.len(), 10);
    // Newest first.
    assert_eq!(b.recent_transactions[0].timestamp, "2026-01-10 01:49:00");
}

// ============================================================================
// Scenario: payroll chain
// ============================================================================

#[test]
fn test_payroll_receiver_is_exempt() {
    // Twelve monthly salary payments, amounts within one percent.
    let records: Vec<RawRecord> = (1..=12)
        .map(|month| {
            let amount = 3000.0 + f64::from(month % 3) * 25.0 - 25.0;
            record("E", "W", amount, &format!("2026-{month:02}-01 09:00:00"))
        })
        .collect();

    let report = analyze(records);

    assert!(row(&report, "W").is_none());
    assert!(report.suspicious_accounts.is_empty());
}

// ============================================================================
// Scenario: shell chain of length 5
// ============================================================================

#[test]
fn test_shell_chain_of_length_five() {
    let report = analyze(vec![
        record("N0", "N1", 9000.0, "2026-01-10 09:00:00"),
        record("N1", "N2", 8900.0, "2026-01-10 10:00:00"),
        record("N2", "N3", 8800.0, "2026-01-10 11:00:00"),
        record("N3", "N4", 8700.0, "2026-01-10 12:00:00"),
    ]);

    assert_eq!(report.suspicious_accounts.len(), 5);
    for i in 0..5 {
        let row = row(&report, &format!("N{i}")).expect("chain member flagged");
        assert_eq!(row.suspicion_score, 20.0);
        assert_eq!(row.detected_patterns, vec!["shell_chain"]);
        assert!(row.explanation.contains("5-hop"));
    }

    assert_eq!(report.fraud_rings.len(), 1);
    let ring = &report.fraud_rings[0];
    assert_eq!(ring.member_accounts.len(), 5);
    assert_eq!(ring.pattern_type, "shell-chain");
    assert_eq!(ring.risk_score, 20.0);
}

// ============================================================================
// Universal properties
// ============================================================================

fn mixed_fixture() -> Vec<RawRecord> {
    let mut records = vec![
        // Triangle.
        record("A", "B", 1000.0, "2026-01-10 10:00:00"),
        record("B", "C", 1000.0, "2026-01-10 11:00:00"),
        record("C", "A", 1000.0, "2026-01-10 12:00:00"),
        // Shell chain.
        record("N0", "N1", 9000.0, "2026-01-11 09:00:00"),
        record("N1", "N2", 8900.0, "2026-01-11 10:00:00"),
        record("N2", "N3", 8800.0, "2026-01-11 11:00:00"),
        record("N3", "N4", 8700.0, "2026-01-11 12:00:00"),
    ];
    // Fan-in sink.
    for i in 0..12 {
        records.push(record(
            &format!("S{i:02}"),
            "SINK",
            150.0,
            &format!("2026-01-12 {:02}:00:00", 6 + i),
        ));
    }
    // One record with an unparseable timestamp still aggregates.
    records.push(record("A", "SINK", 33.0, "not-a-date"));
    records
}

#[test]
fn test_graph_amount_roundtrip() {
    use ledgerscope_core::record::Normalizer;
    use ledgerscope_graph::FlowGraph;

    let table = Normalizer::normalize(mixed_fixture());
    let graph = FlowGraph::from_records(&table);
    assert!((graph.total_amount() - table.total_amount()).abs() < 1e-6);
}

#[test]
fn test_determinism_byte_equal() {
    let mut first = analyze(mixed_fixture());
    let mut second = analyze(mixed_fixture());

    // Wall-clock time is the one legitimately varying field.
    first.summary.processing_time_seconds = 0.0;
    second.summary.processing_time_seconds = 0.0;

    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_scores_capped_at_100() {
    // Two triangles sharing A: raw 150 for A, capped.
    let report = analyze(vec![
        record("A", "B", 500.0, "2026-01-10 10:00:00"),
        record("B", "C", 500.0, "2026-01-10 11:00:00"),
        record("C", "A", 500.0, "2026-01-10 12:00:00"),
        record("A", "D", 500.0, "2026-01-10 13:00:00"),
        record("D", "E", 500.0, "2026-01-10 14:00:00"),
        record("E", "A", 500.0, "2026-01-10 15:00:00"),
    ]);

    let a = row(&report, "A").expect("A flagged");
    assert_eq!(a.suspicion_score, 100.0);
    for account in ["B", "C", "D", "E"] {
        assert_eq!(row(&report, account).unwrap().suspicion_score, 75.0);
    }
    for result in &report.suspicious_accounts {
        assert!(result.suspicion_score >= 0.0 && result.suspicion_score <= 100.0);
    }
}

#[test]
fn test_result_ordering() {
    let report = analyze(mixed_fixture());

    let scores: Vec<f64> = report
        .suspicious_accounts
        .iter()
        .map(|a| a.suspicion_score)
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let ring_scores: Vec<f64> = report.fraud_rings.iter().map(|r| r.risk_score).collect();
    assert!(ring_scores.windows(2).all(|w| w[0] >= w[1]));

    for account in &report.suspicious_accounts {
        let mut sorted = account.detected_patterns.clone();
        sorted.sort();
        assert_eq!(account.detected_patterns, sorted);
    }
}

#[test]
fn test_ring_partition() {
    let report = analyze(mixed_fixture());

    let mut ring_members = std::collections::HashSet::new();
    for ring in &report.fraud_rings {
        assert!(ring.member_accounts.len() >= 2);
        for member in &ring.member_accounts {
            assert!(
                ring_members.insert(member.clone()),
                "{member} appears in two rings"
            );
        }
    }

    for account in &report.suspicious_accounts {
        match &account.ring_id {
            Some(ring_id) => {
                let ring = report
                    .fraud_rings
                    .iter()
                    .find(|r| &r.ring_id == ring_id)
                    .expect("ring exists");
                assert!(ring.member_accounts.contains(&account.account_id));
            }
            None => assert!(!ring_members.contains(&account.account_id)),
        }
    }
}

#[test]
fn test_summary_counts_match() {
    let report = analyze(mixed_fixture());

    assert_eq!(
        report.summary.suspicious_accounts_flagged,
        report.suspicious_accounts.len()
    );
    assert_eq!(report.summary.fraud_rings_detected, report.fraud_rings.len());
    assert_eq!(report.summary.total_transactions, mixed_fixture().len());

    let avg: f64 = report
        .suspicious_accounts
        .iter()
        .map(|a| a.suspicion_score)
        .sum::<f64>()
        / report.suspicious_accounts.len() as f64;
    assert!((report.summary.avg_risk_score - (avg * 100.0).round() / 100.0).abs() < 1e-9);
}

// ============================================================================
// Account dossier
// ============================================================================

#[test]
fn test_dossier_for_fan_in_sink() {
    use ledgerscope_core::config::AnalysisConfig;
    use ledgerscope_core::record::Normalizer;
    use ledgerscope_detect::AnalysisContext;
    use ledgerscope_graph::FlowGraph;
    use std::collections::HashSet;

    let table = Normalizer::normalize(mixed_fixture());
    let graph = FlowGraph::from_records(&table);
    let legitimate = HashSet::new();
    let config = AnalysisConfig::default();
    let ctx = AnalysisContext::new(&table, &graph, &legitimate, &config);

    let dossier = AccountDossier::compile("SINK", &ctx).expect("known account");
    assert_eq!(dossier.role, ledgerscope_detect::AccountRole::Aggregator);
    assert!(dossier.recommendation.starts_with("IMMEDIATE FREEZE"));

    assert!(AccountDossier::compile("NOBODY", &ctx).is_none());
}
