//! Smurfing detection: fan-in and fan-out counterparty concentration.

use crate::types::{tags, AnalysisContext, DetectorMetadata, Finding, PatternDetector};
use chrono::{Duration, NaiveDateTime};
use ledgerscope_core::error::Result;
use ledgerscope_graph::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Score contribution of one fan-in or fan-out finding.
const SMURFING_DELTA: f64 = 40.0;

/// Fan-in / fan-out detector.
///
/// For each account, walks its time-sorted incoming (resp. outgoing)
/// records and counts distinct counterparties inside the sliding window
/// ending at each record. Reaching the threshold emits at most one fan-in
/// and one fan-out finding per account.
#[derive(Debug, Clone)]
pub struct SmurfingDetection {
    metadata: DetectorMetadata,
}

impl Default for SmurfingDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetection {
    /// Create a new smurfing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("sweep/smurfing")
                .with_description("Fan-in/fan-out sliding-window counterparty concentration"),
        }
    }

    /// Run the detector over the shared context.
    #[must_use]
    pub fn compute(ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let window = Duration::hours(ctx.config.smurfing_window_hours);
        let threshold = ctx.config.smurfing_threshold;
        let hours = ctx.config.smurfing_window_hours;

        // (timestamp, counterparty) per account, grouped per direction.
        let mut incoming: BTreeMap<&str, Vec<(NaiveDateTime, NodeId)>> = BTreeMap::new();
        let mut outgoing: BTreeMap<&str, Vec<(NaiveDateTime, NodeId)>> = BTreeMap::new();
        for (record, ts) in ctx.table.timestamped() {
            let sender = ctx
                .graph
                .resolve(&record.sender_id)
                .expect("every sender is interned");
            let receiver = ctx
                .graph
                .resolve(&record.receiver_id)
                .expect("every receiver is interned");
            incoming
                .entry(&record.receiver_id)
                .or_default()
                .push((ts, sender));
            outgoing
                .entry(&record.sender_id)
                .or_default()
                .push((ts, receiver));
        }

        let mut findings = Vec::new();
        for (account, mut events) in incoming {
            events.sort_by_key(|(ts, _)| *ts);
            if Self::window_reaches(&events, window, threshold) {
                findings.push(Finding::new(
                    account,
                    tags::FAN_IN,
                    SMURFING_DELTA,
                    format!(
                        "Fan-in aggregation: {threshold}+ distinct senders within a {hours}-hour window."
                    ),
                ));
            }
        }
        for (account, mut events) in outgoing {
            events.sort_by_key(|(ts, _)| *ts);
            if Self::window_reaches(&events, window, threshold) {
                findings.push(Finding::new(
                    account,
                    tags::FAN_OUT,
                    SMURFING_DELTA,
                    format!(
                        "Fan-out dispersal: {threshold}+ distinct receivers within a {hours}-hour window."
                    ),
                ));
            }
        }
        findings
    }

    /// Linear-time sliding-window distinct count: a two-pointer sweep over
    /// time-sorted events with a counterparty multiset. The window is
    /// left-open right-closed, `(t - window, t]`.
    fn window_reaches(
        events: &[(NaiveDateTime, NodeId)],
        window: Duration,
        threshold: usize,
    ) -> bool {
        let mut active: HashMap<NodeId, usize> = HashMap::new();
        let mut distinct = 0usize;
        let mut tail = 0usize;

        for &(ts, counterparty) in events {
            *active.entry(counterparty).or_insert(0) += 1;
            if active[&counterparty] == 1 {
                distinct += 1;
            }
            let cutoff = ts - window;
            while events[tail].0 <= cutoff {
                let expired = events[tail].1;
                let slot = active.get_mut(&expired).expect("expired entry is active");
                *slot -= 1;
                if *slot == 0 {
                    active.remove(&expired);
                    distinct -= 1;
                }
                tail += 1;
            }
            if distinct >= threshold {
                return true;
            }
        }
        false
    }
}

impl PatternDetector for SmurfingDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    fn scan(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        Ok(Self::compute(ctx))
    }
}
