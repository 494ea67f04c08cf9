//! The aggregated transaction flow graph.

use ledgerscope_core::record::RecordTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense node index into a [`FlowGraph`].
///
/// Account labels are interned in first-appearance order; the dense index
/// keeps grouping, component labeling, and cycle enumeration cheap while
/// the external contract still speaks string ids.
pub type NodeId = u32;

/// Aggregate statistics for one ordered (sender, receiver) edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStats {
    /// Sum of contributing record amounts.
    pub total_amount: f64,
    /// Number of contributing records.
    pub count: u64,
}

/// Directed multigraph aggregated per ordered endpoint pair.
///
/// At most one edge per ordered pair; self-loops are kept (they carry real
/// volume) but cycle and chain traversals never follow them. Adjacency
/// lists are sorted by neighbor index, so iteration order is deterministic
/// given the input record order.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    labels: Vec<String>,
    index: HashMap<String, NodeId>,
    out: Vec<Vec<(NodeId, EdgeStats)>>,
    inc: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl FlowGraph {
    /// Fold a record table into an aggregated flow graph.
    #[must_use]
    pub fn from_records(table: &RecordTable) -> Self {
        let mut graph = Self::default();
        let mut edges: HashMap<(NodeId, NodeId), EdgeStats> = HashMap::new();

        for record in table.iter() {
            let u = graph.intern(&record.sender_id);
            let v = graph.intern(&record.receiver_id);
            let stats = edges.entry((u, v)).or_default();
            stats.total_amount += record.amount;
            stats.count += 1;
        }

        graph.out = vec![Vec::new(); graph.labels.len()];
        graph.inc = vec![Vec::new(); graph.labels.len()];
        graph.edge_count = edges.len();
        for ((u, v), stats) in edges {
            graph.out[u as usize].push((v, stats));
            graph.inc[v as usize].push(u);
        }
        for list in &mut graph.out {
            list.sort_unstable_by_key(|(v, _)| *v);
        }
        for list in &mut graph.inc {
            list.sort_unstable();
        }
        graph
    }

    fn intern(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.labels.len() as NodeId;
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), id);
        id
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of aggregated edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Dense index of an account label, if present.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Account label of a node.
    #[must_use]
    pub fn label(&self, node: NodeId) -> &str {
        &self.labels[node as usize]
    }

    /// All node indices in interning order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.labels.len() as NodeId
    }

    /// Outgoing edges of a node, sorted by target index.
    #[must_use]
    pub fn successors(&self, node: NodeId) -> &[(NodeId, EdgeStats)] {
        &self.out[node as usize]
    }

    /// Predecessor node indices, sorted.
    #[must_use]
    pub fn predecessors(&self, node: NodeId) -> &[NodeId] {
        &self.inc[node as usize]
    }

    /// Number of outgoing aggregated edges.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out[node as usize].len()
    }

    /// Number of incoming aggregated edges.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.inc[node as usize].len()
    }

    /// Total aggregated degree (in + out; a self-loop counts once in each).
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.in_degree(node) + self.out_degree(node)
    }

    /// Aggregate statistics of the (u, v) edge, if present.
    #[must_use]
    pub fn edge(&self, u: NodeId, v: NodeId) -> Option<&EdgeStats> {
        let list = &self.out[u as usize];
        list.binary_search_by_key(&v, |(t, _)| *t)
            .ok()
            .map(|i| &list[i].1)
    }

    /// Iterate every aggregated edge as `(source, target, stats)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeStats)> {
        self.out
            .iter()
            .enumerate()
            .flat_map(|(u, list)| list.iter().map(move |(v, s)| (u as NodeId, *v, s)))
    }

    /// Sum of `total_amount` over every aggregated edge.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.edges().map(|(_, _, s)| s.total_amount).sum()
    }
}
