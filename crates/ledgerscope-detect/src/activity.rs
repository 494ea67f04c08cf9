//! Temporal activity detection: transaction bursts and nocturnal patterns.

use crate::types::{tags, AnalysisContext, DetectorMetadata, Finding, PatternDetector};
use chrono::Timelike;
use ledgerscope_core::error::Result;
use ledgerscope_core::stats;

/// Score contribution of a burst finding.
const BURST_DELTA: f64 = 15.0;
/// Score contribution of a nocturnal finding.
const NOCTURNAL_DELTA: f64 = 25.0;
/// Constant guard term against spurious burst flags on near-constant series.
const BURST_GUARD: f64 = 5.0;
/// Minimum involved records before a nocturnal share is meaningful.
const NOCTURNAL_MIN_INVOLVEMENT: usize = 5;

/// Burst and nocturnal activity detector.
///
/// Burst: an account's outgoing records are bucketed into hour-aligned
/// windows, zero-filled across its observed day span; a bucket towering
/// over `mean + 3*stddev + 5` flags `high_velocity`. Nocturnal: an account
/// with more than the threshold share of its records in night hours flags
/// `nocturnal_activity`.
///
/// Burst findings are emitted before nocturnal ones; fusion applies the
/// burst guard (no prior tags) against that order.
#[derive(Debug, Clone)]
pub struct TemporalActivityDetection {
    metadata: DetectorMetadata,
}

impl Default for TemporalActivityDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalActivityDetection {
    /// Create a new temporal activity detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("sweep/temporal-activity")
                .with_description("Transaction burst and nocturnal share analysis"),
        }
    }

    /// Run the detector over the shared context.
    #[must_use]
    pub fn compute(ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let mut findings = Self::bursts(ctx);
        findings.extend(Self::nocturnal(ctx));
        findings
    }

    /// Burst pass over accounts with enough outgoing records.
    fn bursts(ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let graph = ctx.graph;
        let mut outgoing_total = vec![0usize; graph.node_count()];
        for record in ctx.table.iter() {
            outgoing_total[graph.resolve(&record.sender_id).expect("interned") as usize] += 1;
        }

        let mut findings = Vec::new();
        for node in graph.node_ids() {
            if outgoing_total[node as usize] < ctx.config.burst_sender_min_records {
                continue;
            }
            let account = graph.label(node);
            let buckets = Self::hourly_buckets(ctx, account);
            if buckets.is_empty() {
                continue;
            }
            let max = buckets.iter().copied().fold(f64::MIN, f64::max);
            let mean = stats::mean(&buckets);
            let stddev = stats::pop_stddev(&buckets);
            if max > mean + 3.0 * stddev + BURST_GUARD {
                findings.push(Finding::new(
                    account,
                    tags::HIGH_VELOCITY,
                    BURST_DELTA,
                    "Detected unusual transaction burst frequency.",
                ));
            }
        }
        findings
    }

    /// Hour-aligned outgoing counts, zero-filled from the first to the last
    /// observed day of the account.
    fn hourly_buckets(ctx: &AnalysisContext<'_>, account: &str) -> Vec<f64> {
        let stamps: Vec<chrono::NaiveDateTime> = ctx
            .involved_records(account)
            .filter(|r| r.sender_id == account)
            .filter_map(|r| r.timestamp)
            .collect();
        let Some(first) = stamps.iter().min() else {
            return Vec::new();
        };
        let last = stamps.iter().max().expect("non-empty");

        let first_day = first.date();
        let days = (last.date() - first_day).num_days() as usize + 1;
        let mut buckets = vec![0.0; days * 24];
        for ts in &stamps {
            let day = (ts.date() - first_day).num_days() as usize;
            buckets[day * 24 + ts.hour() as usize] += 1.0;
        }
        buckets
    }

    /// Nocturnal pass over every sufficiently active account.
    fn nocturnal(ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let graph = ctx.graph;
        let mut findings = Vec::new();
        for node in graph.node_ids() {
            let account = graph.label(node);
            let total = ctx.involvement(account).len();
            if total <= NOCTURNAL_MIN_INVOLVEMENT {
                continue;
            }
            let night = ctx
                .involved_records(account)
                .filter_map(|r| r.timestamp)
                .filter(|ts| ctx.config.is_night_hour(ts.hour()))
                .count();
            let pct = night as f64 / total as f64 * 100.0;
            if pct > ctx.config.nocturnal_threshold_pct {
                findings.push(Finding::new(
                    account,
                    tags::NOCTURNAL,
                    NOCTURNAL_DELTA,
                    format!(
                        "Suspicious nocturnal pattern: {pct:.1}% of volume during 23:00-05:00."
                    ),
                ));
            }
        }
        findings
    }
}

impl PatternDetector for TemporalActivityDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    fn scan(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        Ok(Self::compute(ctx))
    }
}
