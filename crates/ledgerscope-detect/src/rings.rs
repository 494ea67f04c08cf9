//! Ring clustering: connected components over the flagged subgraph.

use crate::types::{FraudRing, PatternCategory, SuspiciousAccount};
use ledgerscope_core::stats;
use ledgerscope_graph::{connected_components, FlowGraph, NodeId};
use std::collections::{BTreeSet, HashMap};

/// Groups flagged accounts into rings via undirected connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingClusterer;

impl RingClusterer {
    /// Cluster flagged accounts and annotate them with their ring id.
    ///
    /// Flagged accounts are sorted by id before component labeling, which
    /// makes `RING_###` numbering reproducible across runs and platforms.
    /// Singleton components yield no ring. Returned rings are sorted by
    /// risk score descending.
    #[must_use]
    pub fn compute(accounts: &mut [SuspiciousAccount], graph: &FlowGraph) -> Vec<FraudRing> {
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut flagged: Vec<(String, NodeId)> = Vec::new();
        for (idx, account) in accounts.iter().enumerate() {
            by_id.insert(account.account_id.clone(), idx);
            if let Some(node) = graph.resolve(&account.account_id) {
                flagged.push((account.account_id.clone(), node));
            }
        }
        flagged.sort_by(|a, b| a.0.cmp(&b.0));
        let nodes: Vec<NodeId> = flagged.iter().map(|(_, n)| *n).collect();

        let mut rings = Vec::new();
        let mut ring_index = 0usize;
        for component in connected_components(graph, &nodes) {
            if component.len() < 2 {
                continue;
            }
            ring_index += 1;
            let ring_id = format!("RING_{ring_index:03}");

            let mut members: Vec<String> = component
                .iter()
                .map(|&n| graph.label(n).to_string())
                .collect();
            members.sort();

            let mut member_scores = Vec::with_capacity(members.len());
            let mut categories: BTreeSet<PatternCategory> = BTreeSet::new();
            for member in &members {
                let account = &mut accounts[by_id[member.as_str()]];
                account.ring_id = Some(ring_id.clone());
                member_scores.push(account.suspicion_score);
                for tag in &account.detected_patterns {
                    if let Some(category) = PatternCategory::from_tag(tag) {
                        categories.insert(category);
                    }
                }
            }

            let pattern_type = if categories.is_empty() {
                "unclassified".to_string()
            } else {
                categories
                    .iter()
                    .map(PatternCategory::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            rings.push(FraudRing {
                ring_id,
                member_accounts: members,
                pattern_type,
                risk_score: stats::round2(stats::mean(&member_scores)),
            });
        }

        rings.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.ring_id.cmp(&b.ring_id))
        });
        rings
    }
}
