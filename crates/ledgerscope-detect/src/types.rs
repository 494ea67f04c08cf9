//! Common detection types: findings, result records, and the detector trait.

use ledgerscope_core::config::AnalysisConfig;
use ledgerscope_core::error::Result;
use ledgerscope_core::record::{RecordTable, Transaction};
use ledgerscope_graph::FlowGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Pattern tags attached to findings and result rows.
pub mod tags {
    /// Many distinct senders converging within the smurfing window.
    pub const FAN_IN: &str = "fan_in";
    /// Many distinct receivers diverging within the smurfing window.
    pub const FAN_OUT: &str = "fan_out";
    /// Membership in a linear low-activity pass-through chain.
    pub const SHELL_CHAIN: &str = "shell_chain";
    /// Outgoing transaction burst well above the account's own baseline.
    pub const HIGH_VELOCITY: &str = "high_velocity";
    /// Disproportionate share of night-hour activity.
    pub const NOCTURNAL: &str = "nocturnal_activity";

    /// Tag for participation in a simple cycle of the given length.
    #[must_use]
    pub fn cycle(length: usize) -> String {
        format!("cycle_length_{length}")
    }
}

/// Coarse pattern families used for ring classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternCategory {
    /// Circular fund routing.
    Cycle,
    /// Shell chain layering.
    ShellChain,
    /// Fan-in/fan-out structuring.
    Smurfing,
}

impl PatternCategory {
    /// Category name as reported in ring summaries.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Cycle => "cycle",
            PatternCategory::ShellChain => "shell-chain",
            PatternCategory::Smurfing => "smurfing",
        }
    }

    /// Classify a pattern tag into its family, if any.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.contains("cycle") {
            Some(PatternCategory::Cycle)
        } else if tag.contains("fan") {
            Some(PatternCategory::Smurfing)
        } else if tag.contains("shell") {
            Some(PatternCategory::ShellChain)
        } else {
            None
        }
    }
}

/// A single detector observation about one account.
///
/// Findings are immutable once emitted; fusion owns all aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Account the observation concerns.
    pub account: String,
    /// Pattern tag.
    pub tag: String,
    /// Score contribution.
    pub score_delta: f64,
    /// Human-readable explanation fragment.
    pub explanation: String,
}

impl Finding {
    /// Create a new finding.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        tag: impl Into<String>,
        score_delta: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            tag: tag.into(),
            score_delta,
            explanation: explanation.into(),
        }
    }
}

/// Identification metadata for a detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorMetadata {
    /// Unique detector identifier (e.g. `"sweep/smurfing"`).
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Implementation version.
    pub version: u32,
}

impl DetectorMetadata {
    /// Create metadata with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// Read-only shared state for one detector sweep.
///
/// Built once per analysis; detectors may run in parallel over it and must
/// return their findings by value.
#[derive(Debug)]
pub struct AnalysisContext<'a> {
    /// The normalized record table.
    pub table: &'a RecordTable,
    /// The aggregated flow graph.
    pub graph: &'a FlowGraph,
    /// Accounts exempt from flagging.
    pub legitimate: &'a HashSet<String>,
    /// Detection thresholds.
    pub config: &'a AnalysisConfig,
    involvement: HashMap<&'a str, Vec<usize>>,
}

impl<'a> AnalysisContext<'a> {
    /// Build a context, indexing record involvement per account.
    #[must_use]
    pub fn new(
        table: &'a RecordTable,
        graph: &'a FlowGraph,
        legitimate: &'a HashSet<String>,
        config: &'a AnalysisConfig,
    ) -> Self {
        let mut involvement: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, record) in table.iter().enumerate() {
            involvement.entry(&record.sender_id).or_default().push(idx);
            if record.receiver_id != record.sender_id {
                involvement.entry(&record.receiver_id).or_default().push(idx);
            }
        }
        Self {
            table,
            graph,
            legitimate,
            config,
            involvement,
        }
    }

    /// Indices of records involving `account` as either endpoint, in table
    /// order (a self-loop record appears once).
    #[must_use]
    pub fn involvement(&self, account: &str) -> &[usize] {
        self.involvement
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records involving `account`, in table order.
    pub fn involved_records(&self, account: &str) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.involvement(account)
            .iter()
            .map(|&idx| &self.table.records()[idx])
    }
}

/// A pattern detector: one independent pass over the shared analysis state.
pub trait PatternDetector: Send + Sync {
    /// Returns the detector metadata.
    fn metadata(&self) -> &DetectorMetadata;

    /// Run the pass and return findings by value.
    fn scan(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>>;

    /// Returns the detector id.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// A record as it appears inside a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    /// Transaction identifier.
    pub transaction_id: String,
    /// Sending account id.
    pub sender_id: String,
    /// Receiving account id.
    pub receiver_id: String,
    /// Transferred amount.
    pub amount: f64,
    /// Timestamp formatted as `YYYY-MM-DD HH:MM:SS`, empty when unparsed.
    pub timestamp: String,
}

impl From<&Transaction> for RecordView {
    fn from(record: &Transaction) -> Self {
        Self {
            transaction_id: record.transaction_id.clone(),
            sender_id: record.sender_id.clone(),
            receiver_id: record.receiver_id.clone(),
            amount: record.amount,
            timestamp: record
                .timestamp
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

/// A flagged account with its fused score and supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account id.
    pub account_id: String,
    /// Fused suspicion score in `[0, 100]`, two decimals.
    pub suspicion_score: f64,
    /// Pattern tags, sorted ascending.
    pub detected_patterns: Vec<String>,
    /// Space-joined deduplicated explanation.
    pub explanation: String,
    /// Whether the account matched a legitimacy rule.
    pub is_legitimate_hub: bool,
    /// Ring membership, when clustered.
    pub ring_id: Option<String>,
    /// Up to ten most recent involved records, newest first.
    pub recent_transactions: Vec<RecordView>,
}

/// A cluster of connected flagged accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Ring identifier, `RING_###`.
    pub ring_id: String,
    /// Member account ids, sorted ascending.
    pub member_accounts: Vec<String>,
    /// Sorted, comma-joined pattern categories.
    pub pattern_type: String,
    /// Average member suspicion score, two decimals.
    pub risk_score: f64,
}

/// A node of the visualization subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Account id.
    pub id: String,
    /// Display label (the account id).
    pub label: String,
    /// Fused suspicion score, zero for unflagged neighbors.
    pub risk_score: f64,
    /// Pattern tags, empty for unflagged neighbors.
    pub tags: Vec<String>,
    /// Total aggregated degree in the flow graph.
    pub total_transactions: usize,
    /// Whether the account matched a legitimacy rule.
    pub is_legitimate: bool,
    /// Ring membership, when clustered.
    pub ring_id: Option<String>,
}

/// An edge of the visualization subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source account id.
    pub from_node: String,
    /// Target account id.
    pub to_node: String,
    /// Aggregate amount formatted as currency without fraction.
    pub label: String,
    /// Aggregate amount.
    pub value: f64,
}

/// The visualization subgraph around flagged accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    /// Nodes, sorted by account id.
    pub nodes: Vec<GraphNode>,
    /// Edges of the induced subgraph, sorted by endpoints.
    pub edges: Vec<GraphEdge>,
}
