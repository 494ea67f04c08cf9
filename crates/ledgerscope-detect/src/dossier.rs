//! Per-account behavioral deep-dive.
//!
//! A reporting companion to the detection sweep: classifies an account's
//! topological role and summarizes its temporal behavior. Reporting
//! thresholds here are intentionally softer than the detectors' flagging
//! thresholds (night share 25% vs 40%).

use crate::types::AnalysisContext;
use chrono::Timelike;
use ledgerscope_core::stats;
use serde::{Deserialize, Serialize};

/// Night-share percentage above which the dossier reports nocturnal drift.
const REPORT_NIGHT_PCT: f64 = 25.0;
/// Coefficient-of-variation bound for robotic-cadence reporting.
const ROBOTIC_CV: f64 = 0.2;

/// Topological role of an account in the flow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountRole {
    /// Many inbound edges, almost no outbound: collection point.
    Aggregator,
    /// Many outbound edges, almost no inbound: dispersal point.
    Distributor,
    /// Both directions active: pass-through layer.
    Intermediary,
    /// No meaningful connectivity.
    Isolated,
}

impl AccountRole {
    /// Human-readable role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Aggregator => "Aggregator (Fan-in)",
            AccountRole::Distributor => "Distributor (Fan-out)",
            AccountRole::Intermediary => "Intermediary Layer",
            AccountRole::Isolated => "Isolated Node",
        }
    }
}

/// One observed behavioral trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralFlag {
    /// Trait kind (Topology, Temporal, Nocturnal, Robotic).
    pub kind: String,
    /// Trait detail.
    pub detail: String,
}

/// Behavioral deep-dive for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDossier {
    /// Account id.
    pub account_id: String,
    /// Classified topological role.
    pub role: AccountRole,
    /// One-line summary.
    pub forensic_summary: String,
    /// Observed behavioral traits.
    pub behavioral_flags: Vec<BehavioralFlag>,
    /// Suggested next action.
    pub recommendation: String,
    /// Heuristic confidence in `[0.85, 0.95]`.
    pub prediction_confidence: f64,
}

impl AccountDossier {
    /// Compile a dossier for `account`; `None` when the account does not
    /// appear in the flow graph.
    #[must_use]
    pub fn compile(account: &str, ctx: &AnalysisContext<'_>) -> Option<Self> {
        let node = ctx.graph.resolve(account)?;
        let in_degree = ctx.graph.in_degree(node);
        let out_degree = ctx.graph.out_degree(node);
        let role = Self::classify_role(in_degree, out_degree);

        let mut flags = vec![BehavioralFlag {
            kind: "Topology".to_string(),
            detail: format!(
                "Degree centrality ({in_degree} in, {out_degree} out) confirms {} role.",
                role.as_str()
            ),
        }];
        flags.push(BehavioralFlag {
            kind: "Temporal".to_string(),
            detail: Self::temporal_detail(ctx, account),
        });
        flags.extend(Self::rhythm_flags(ctx, account));

        let confidence =
            0.85 + 0.10 * ((in_degree + out_degree) as f64 / 20.0).min(1.0);
        let recommendation = if in_degree > 10 {
            "IMMEDIATE FREEZE. High-velocity aggregator profile detected."
        } else {
            "MONITOR. Potential shell entity in fund-routing chain."
        };

        Some(Self {
            account_id: account.to_string(),
            role,
            forensic_summary: format!(
                "Behavioral analysis of {account} reveals a high-risk {} pattern.",
                role.as_str()
            ),
            behavioral_flags: flags,
            recommendation: recommendation.to_string(),
            prediction_confidence: confidence,
        })
    }

    fn classify_role(in_degree: usize, out_degree: usize) -> AccountRole {
        if in_degree > 10 && out_degree < 2 {
            AccountRole::Aggregator
        } else if out_degree > 10 && in_degree < 2 {
            AccountRole::Distributor
        } else if in_degree >= 1 && out_degree >= 1 {
            AccountRole::Intermediary
        } else {
            AccountRole::Isolated
        }
    }

    fn temporal_detail(ctx: &AnalysisContext<'_>, account: &str) -> String {
        let stamps: Vec<chrono::NaiveDateTime> = ctx
            .involved_records(account)
            .filter_map(|r| r.timestamp)
            .collect();
        let total = ctx.involvement(account).len();
        let (Some(first), Some(last)) = (stamps.iter().min(), stamps.iter().max()) else {
            return "Insufficient temporal metadata available.".to_string();
        };

        let duration_secs = (*last - *first).num_seconds().max(0) as f64;
        let readable = format_duration(duration_secs);
        if duration_secs < 3600.0 {
            format!("High-velocity burst: {total} tx in {readable}.")
        } else {
            let velocity = total as f64 / (duration_secs / 3600.0).max(1.0);
            format!("Temporal density: {velocity:.1} tx/hr over a {readable} window.")
        }
    }

    /// Nocturnal-drift and robotic-cadence reporting flags.
    fn rhythm_flags(ctx: &AnalysisContext<'_>, account: &str) -> Vec<BehavioralFlag> {
        let mut flags = Vec::new();
        let total = ctx.involvement(account).len();
        if total == 0 {
            return flags;
        }

        let stamps: Vec<chrono::NaiveDateTime> = ctx
            .involved_records(account)
            .filter_map(|r| r.timestamp)
            .collect();
        if stamps.is_empty() {
            return flags;
        }

        let night = stamps
            .iter()
            .filter(|ts| ctx.config.is_night_hour(ts.hour()))
            .count();
        let night_pct = night as f64 / total as f64 * 100.0;
        if night_pct > REPORT_NIGHT_PCT {
            flags.push(BehavioralFlag {
                kind: "Nocturnal".to_string(),
                detail: format!(
                    "{night_pct:.1}% of activity occurs in dead-of-night hours (11PM-5AM)."
                ),
            });
        }

        // Hour-aligned buckets, zero-filled from first to last observed hour.
        let first = stamps.iter().min().expect("non-empty");
        let last = stamps.iter().max().expect("non-empty");
        let first_hour = first.and_utc().timestamp() / 3600;
        let span = (last.and_utc().timestamp() / 3600 - first_hour) as usize + 1;
        let mut buckets = vec![0.0; span];
        for ts in &stamps {
            buckets[(ts.and_utc().timestamp() / 3600 - first_hour) as usize] += 1.0;
        }
        if buckets.len() > 3 {
            let mean = stats::mean(&buckets);
            if mean > 0.0 && stats::sample_stddev(&buckets) / mean < ROBOTIC_CV {
                flags.push(BehavioralFlag {
                    kind: "Robotic".to_string(),
                    detail: "Highly consistent transaction cadence suggestive of automated pooling."
                        .to_string(),
                });
            }
        }
        flags
    }
}

/// Human-readable duration, coarsest two units.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86_400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86_400, (seconds % 86_400) / 3600)
    }
}
