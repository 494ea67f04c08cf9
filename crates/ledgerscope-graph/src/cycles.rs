//! Bounded simple directed cycle enumeration.

use crate::types::{FlowGraph, NodeId};

/// Enumerate simple directed cycles with node count in `[min_len, max_len]`
/// over the subgraph induced by `allowed` nodes.
///
/// Each cycle is reported exactly once, rooted at its smallest node index
/// and in edge direction from there; the search never visits nodes below
/// the current root, which is what prevents duplicate rotations. Self-loops
/// never participate (a loop edge closes at length 1, below any valid
/// `min_len`).
#[must_use]
pub fn simple_cycles_bounded(
    graph: &FlowGraph,
    allowed: &[bool],
    min_len: usize,
    max_len: usize,
) -> Vec<Vec<NodeId>> {
    debug_assert_eq!(allowed.len(), graph.node_count());
    let mut cycles = Vec::new();
    if min_len < 2 || max_len < min_len {
        return cycles;
    }

    let mut on_path = vec![false; graph.node_count()];
    let mut path: Vec<NodeId> = Vec::with_capacity(max_len);

    for root in graph.node_ids() {
        if !allowed[root as usize] {
            continue;
        }
        path.push(root);
        on_path[root as usize] = true;
        extend(graph, allowed, root, min_len, max_len, &mut path, &mut on_path, &mut cycles);
        on_path[root as usize] = false;
        path.pop();
    }
    cycles
}

#[allow(clippy::too_many_arguments)]
fn extend(
    graph: &FlowGraph,
    allowed: &[bool],
    root: NodeId,
    min_len: usize,
    max_len: usize,
    path: &mut Vec<NodeId>,
    on_path: &mut [bool],
    cycles: &mut Vec<Vec<NodeId>>,
) {
    let current = *path.last().expect("path never empty during extension");
    for &(next, _) in graph.successors(current) {
        if next == root {
            if path.len() >= min_len {
                cycles.push(path.clone());
            }
            continue;
        }
        // Rotations are canonicalized by never descending below the root.
        if next < root || !allowed[next as usize] || on_path[next as usize] {
            continue;
        }
        if path.len() == max_len {
            continue;
        }
        path.push(next);
        on_path[next as usize] = true;
        extend(graph, allowed, root, min_len, max_len, path, on_path, cycles);
        on_path[next as usize] = false;
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerscope_core::record::{RecordTable, Transaction};

    fn graph(rows: &[(&str, &str)]) -> FlowGraph {
        FlowGraph::from_records(&RecordTable::new(
            rows.iter()
                .enumerate()
                .map(|(i, (s, r))| Transaction::new(format!("TX_{i:06}"), *s, *r, 1.0, None))
                .collect(),
        ))
    }

    fn all_allowed(graph: &FlowGraph) -> Vec<bool> {
        vec![true; graph.node_count()]
    }

    #[test]
    fn test_triangle_found_once() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = simple_cycles_bounded(&g, &all_allowed(&g), 3, 5);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
        let labels: Vec<&str> = cycles[0].iter().map(|&n| g.label(n)).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_two_cycle_below_min_len_ignored() {
        let g = graph(&[("A", "B"), ("B", "A")]);
        assert!(simple_cycles_bounded(&g, &all_allowed(&g), 3, 5).is_empty());
        assert_eq!(simple_cycles_bounded(&g, &all_allowed(&g), 2, 5).len(), 1);
    }

    #[test]
    fn test_self_loop_never_participates() {
        let g = graph(&[("A", "A"), ("A", "B"), ("B", "A")]);
        let cycles = simple_cycles_bounded(&g, &all_allowed(&g), 3, 5);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_length_bound_respected() {
        // Hexagon: a 6-cycle must not be reported with max_len 5.
        let g = graph(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "E"),
            ("E", "F"),
            ("F", "A"),
        ]);
        assert!(simple_cycles_bounded(&g, &all_allowed(&g), 3, 5).is_empty());
        assert_eq!(simple_cycles_bounded(&g, &all_allowed(&g), 3, 6).len(), 1);
    }

    #[test]
    fn test_disallowed_node_breaks_cycle() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let mut allowed = all_allowed(&g);
        allowed[g.resolve("B").unwrap() as usize] = false;
        assert!(simple_cycles_bounded(&g, &allowed, 3, 5).is_empty());
    }

    #[test]
    fn test_overlapping_cycles_all_reported() {
        // Two triangles sharing the edge A->B.
        let g = graph(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("B", "D"),
            ("D", "A"),
        ]);
        let cycles = simple_cycles_bounded(&g, &all_allowed(&g), 3, 5);
        assert_eq!(cycles.len(), 2);
        for cycle in &cycles {
            assert_eq!(cycle.len(), 3);
        }
    }
}
