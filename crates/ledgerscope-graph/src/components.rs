//! Connected components over the undirected projection.

use crate::types::{FlowGraph, NodeId};

/// Union-find over dense node indices.
#[derive(Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Connected components of the undirected projection restricted to `nodes`.
///
/// Edge direction is ignored; only edges with both endpoints in `nodes`
/// connect. Components are emitted in order of their first member in the
/// `nodes` order, members in `nodes` order; pass a sorted slice to get
/// fully deterministic, sorted output.
#[must_use]
pub fn connected_components(graph: &FlowGraph, nodes: &[NodeId]) -> Vec<Vec<NodeId>> {
    let mut member = vec![false; graph.node_count()];
    for &n in nodes {
        member[n as usize] = true;
    }

    let mut dsu = DisjointSet::new(graph.node_count());
    for &u in nodes {
        for &(v, _) in graph.successors(u) {
            if u != v && member[v as usize] {
                dsu.union(u as usize, v as usize);
            }
        }
    }

    let mut component_of_root: Vec<Option<usize>> = vec![None; graph.node_count()];
    let mut components: Vec<Vec<NodeId>> = Vec::new();
    for &n in nodes {
        let root = dsu.find(n as usize);
        let idx = match component_of_root[root] {
            Some(idx) => idx,
            None => {
                component_of_root[root] = Some(components.len());
                components.push(Vec::new());
                components.len() - 1
            }
        };
        components[idx].push(n);
    }
    components
}
