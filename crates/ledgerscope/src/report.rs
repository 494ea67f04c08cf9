//! The analysis result bundle.

use ledgerscope_detect::{FraudRing, GraphData, SuspiciousAccount};
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one analysis invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Number of accounts in the flow graph.
    pub total_accounts_analyzed: usize,
    /// Number of normalized records.
    pub total_transactions: usize,
    /// Number of flagged accounts.
    pub suspicious_accounts_flagged: usize,
    /// Number of rings.
    pub fraud_rings_detected: usize,
    /// Mean flagged score, two decimals; zero when nothing was flagged.
    pub avg_risk_score: f64,
    /// Wall-clock processing time in seconds, two decimals.
    pub processing_time_seconds: f64,
    /// Detectors that failed and were excluded from fusion; empty on a
    /// clean run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detectors_failed: Vec<String>,
}

/// Complete result bundle of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Flagged accounts, sorted by score descending.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings, sorted by risk score descending.
    pub fraud_rings: Vec<FraudRing>,
    /// Visualization subgraph around flagged accounts.
    pub graph_data: GraphData,
    /// Aggregate statistics.
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// An empty report with zero counts, returned for empty usable input.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialize to a JSON string. Field order is fixed by the type
    /// definitions, so identical reports serialize byte-identically.
    pub fn to_json(&self) -> ledgerscope_core::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ledgerscope_core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
