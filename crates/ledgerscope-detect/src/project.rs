//! Visualization subgraph projection.

use crate::types::{GraphData, GraphEdge, GraphNode, SuspiciousAccount};
use ledgerscope_graph::{FlowGraph, NodeId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Projects the flagged neighborhood of the flow graph for visualization.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphProjection;

impl GraphProjection {
    /// Select flagged accounts plus their direct predecessors and
    /// successors, with all edges of the induced subgraph.
    ///
    /// Nodes are sorted by account id and edges by endpoint pair, so the
    /// projection serializes identically across runs.
    #[must_use]
    pub fn compute(
        accounts: &[SuspiciousAccount],
        legitimate: &HashSet<String>,
        graph: &FlowGraph,
    ) -> GraphData {
        let by_id: HashMap<&str, &SuspiciousAccount> = accounts
            .iter()
            .map(|a| (a.account_id.as_str(), a))
            .collect();

        let mut relevant: BTreeSet<NodeId> = BTreeSet::new();
        for account in accounts {
            let Some(node) = graph.resolve(&account.account_id) else {
                continue;
            };
            relevant.insert(node);
            for &(succ, _) in graph.successors(node) {
                relevant.insert(succ);
            }
            for &pred in graph.predecessors(node) {
                relevant.insert(pred);
            }
        }

        let mut nodes: Vec<GraphNode> = relevant
            .iter()
            .map(|&node| {
                let id = graph.label(node);
                let flagged = by_id.get(id);
                GraphNode {
                    id: id.to_string(),
                    label: id.to_string(),
                    risk_score: flagged.map_or(0.0, |a| a.suspicion_score),
                    tags: flagged.map_or_else(Vec::new, |a| a.detected_patterns.clone()),
                    total_transactions: graph.degree(node),
                    is_legitimate: legitimate.contains(id),
                    ring_id: flagged.and_then(|a| a.ring_id.clone()),
                }
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<GraphEdge> = Vec::new();
        for &node in &relevant {
            for &(succ, stats) in graph.successors(node) {
                if relevant.contains(&succ) {
                    edges.push(GraphEdge {
                        from_node: graph.label(node).to_string(),
                        to_node: graph.label(succ).to_string(),
                        label: format!("${:.0}", stats.total_amount),
                        value: stats.total_amount,
                    });
                }
            }
        }
        edges.sort_by(|a, b| {
            a.from_node
                .cmp(&b.from_node)
                .then_with(|| a.to_node.cmp(&b.to_node))
        });

        GraphData { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tags;
    use ledgerscope_core::record::{RecordTable, Transaction};

    fn graph(rows: &[(&str, &str, f64)]) -> FlowGraph {
        FlowGraph::from_records(&RecordTable::new(
            rows.iter()
                .enumerate()
                .map(|(i, (s, r, a))| Transaction::new(format!("TX_{i:06}"), *s, *r, *a, None))
                .collect(),
        ))
    }

    fn flagged(id: &str, score: f64) -> SuspiciousAccount {
        SuspiciousAccount {
            account_id: id.to_string(),
            suspicion_score: score,
            detected_patterns: vec![tags::FAN_IN.to_string()],
            explanation: String::new(),
            is_legitimate_hub: false,
            ring_id: None,
            recent_transactions: Vec::new(),
        }
    }

    #[test]
    fn test_one_hop_neighborhood_selected() {
        // D-E is disconnected from the flagged neighborhood of B.
        let g = graph(&[
            ("A", "B", 100.0),
            ("B", "C", 50.0),
            ("D", "E", 10.0),
        ]);
        let accounts = vec![flagged("B", 40.0)];

        let data = GraphProjection::compute(&accounts, &HashSet::new(), &g);
        let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(data.edges.len(), 2);
    }

    #[test]
    fn test_node_annotations() {
        let g = graph(&[("A", "B", 1234.6)]);
        let accounts = vec![flagged("B", 40.0)];
        let legitimate: HashSet<String> = ["A".to_string()].into_iter().collect();

        let data = GraphProjection::compute(&accounts, &legitimate, &g);
        let a = data.nodes.iter().find(|n| n.id == "A").unwrap();
        assert_eq!(a.risk_score, 0.0);
        assert!(a.tags.is_empty());
        assert!(a.is_legitimate);
        assert_eq!(a.total_transactions, 1);

        let b = data.nodes.iter().find(|n| n.id == "B").unwrap();
        assert_eq!(b.risk_score, 40.0);
        assert!(!b.is_legitimate);
    }

    #[test]
    fn test_edge_label_has_no_fraction() {
        let g = graph(&[("A", "B", 1234.6)]);
        let data = GraphProjection::compute(&[flagged("B", 40.0)], &HashSet::new(), &g);
        assert_eq!(data.edges[0].label, "$1235");
        assert!((data.edges[0].value - 1234.6).abs() < 1e-9);
    }

    #[test]
    fn test_edges_between_neighbors_included() {
        // A and C are both neighbors of flagged B; the A->C edge belongs to
        // the induced subgraph even though neither endpoint is flagged.
        let g = graph(&[("A", "B", 10.0), ("B", "C", 10.0), ("A", "C", 5.0)]);
        let data = GraphProjection::compute(&[flagged("B", 40.0)], &HashSet::new(), &g);
        assert!(data
            .edges
            .iter()
            .any(|e| e.from_node == "A" && e.to_node == "C"));
    }
}
