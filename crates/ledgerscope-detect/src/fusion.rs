//! Score fusion: findings to ranked suspicious-account rows.

use crate::types::{tags, AnalysisContext, Finding, RecordView, SuspiciousAccount};
use ledgerscope_core::stats;
use std::collections::{BTreeSet, HashMap};

/// Maximum fused score.
const SCORE_CAP: f64 = 100.0;
/// Number of recent records attached to each result row.
const RECENT_LIMIT: usize = 10;

/// Fuses detector findings into per-account results.
///
/// Findings must arrive in detector order (smurfing, cycle, shell, burst,
/// nocturnal); fusion observes them as complete sets, so the outcome does
/// not depend on detector completion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreFusion;

impl ScoreFusion {
    /// Fuse ordered detector outputs into the ranked flagged-account list.
    ///
    /// Legitimate accounts are dropped entirely. A `high_velocity` finding
    /// only lands on an account that has no tag yet, which guards against
    /// double-counting bursts on already-flagged accounts.
    #[must_use]
    pub fn compute(
        detector_findings: &[Vec<Finding>],
        ctx: &AnalysisContext<'_>,
    ) -> Vec<SuspiciousAccount> {
        let mut scores: HashMap<&str, f64> = HashMap::new();
        let mut tag_sets: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        let mut explanations: HashMap<&str, Vec<&str>> = HashMap::new();

        for finding in detector_findings.iter().flatten() {
            let account = finding.account.as_str();
            if ctx.legitimate.contains(account) {
                continue;
            }
            if finding.tag == tags::HIGH_VELOCITY
                && tag_sets.get(account).is_some_and(|t| !t.is_empty())
            {
                continue;
            }
            *scores.entry(account).or_insert(0.0) += finding.score_delta;
            tag_sets.entry(account).or_default().insert(&finding.tag);
            let texts = explanations.entry(account).or_default();
            if !texts.contains(&finding.explanation.as_str()) {
                texts.push(&finding.explanation);
            }
        }

        let mut results: Vec<SuspiciousAccount> = scores
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .map(|(account, score)| SuspiciousAccount {
                account_id: account.to_string(),
                suspicion_score: stats::round2(score.min(SCORE_CAP)),
                detected_patterns: tag_sets[account]
                    .iter()
                    .map(|t| (*t).to_string())
                    .collect(),
                explanation: explanations[account].join(" "),
                is_legitimate_hub: ctx.legitimate.contains(account),
                ring_id: None,
                recent_transactions: Self::recent_records(ctx, account),
            })
            .collect();

        results.sort_by(|a, b| {
            b.suspicion_score
                .partial_cmp(&a.suspicion_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });
        results
    }

    /// The account's most recent involved records, newest first; records
    /// without a parseable timestamp sort last.
    fn recent_records(ctx: &AnalysisContext<'_>, account: &str) -> Vec<RecordView> {
        let mut involved: Vec<usize> = ctx.involvement(account).to_vec();
        involved.sort_by(|&a, &b| {
            let (ta, tb) = (
                ctx.table.records()[a].timestamp,
                ctx.table.records()[b].timestamp,
            );
            match (ta, tb) {
                (Some(x), Some(y)) => y.cmp(&x).then(a.cmp(&b)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.cmp(&b),
            }
        });
        involved
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|idx| RecordView::from(&ctx.table.records()[idx]))
            .collect()
    }
}
