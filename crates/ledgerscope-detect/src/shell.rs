//! Shell chain detection: linear money-passing through low-activity nodes.

use crate::types::{tags, AnalysisContext, DetectorMetadata, Finding, PatternDetector};
use ledgerscope_core::error::Result;
use ledgerscope_graph::{FlowGraph, NodeId};
use std::collections::BTreeMap;

/// Score contribution for shell chain membership.
const SHELL_DELTA: f64 = 20.0;

/// Shell chain detector.
///
/// Starting from every node with out-degree exactly one, follows the unique
/// successor while it stays a low-activity single-exit intermediary. The
/// terminating successor is still appended; a revisit of the path stops the
/// walk. Paths reaching the minimum length are emitted as chains.
#[derive(Debug, Clone)]
pub struct ShellChainDetection {
    metadata: DetectorMetadata,
}

impl Default for ShellChainDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellChainDetection {
    /// Create a new shell chain detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("sweep/shell-chain")
                .with_description("Linear chains through low-activity intermediaries"),
        }
    }

    /// Run the detector over the shared context.
    ///
    /// Each node in any emitted chain receives a single +20 finding; the
    /// explanation names the longest chain the node participated in.
    #[must_use]
    pub fn compute(ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let chains = Self::trace_chains(ctx);

        // Longest chain per member node.
        let mut longest: BTreeMap<NodeId, usize> = BTreeMap::new();
        for chain in &chains {
            for &node in chain {
                let entry = longest.entry(node).or_insert(0);
                *entry = (*entry).max(chain.len());
            }
        }

        longest
            .into_iter()
            .map(|(node, hops)| {
                Finding::new(
                    ctx.graph.label(node),
                    tags::SHELL_CHAIN,
                    SHELL_DELTA,
                    format!("Part of a {hops}-hop layered shell network."),
                )
            })
            .collect()
    }

    /// Trace all qualifying chains, in start-node interning order.
    fn trace_chains(ctx: &AnalysisContext<'_>) -> Vec<Vec<NodeId>> {
        let graph = ctx.graph;
        let activity = Self::activity_counts(ctx);
        let (lo, hi) = ctx.config.shell_activity_range;
        let min_hops = ctx.config.shell_min_hops;

        let mut chains = Vec::new();
        for start in graph.node_ids() {
            if graph.out_degree(start) != 1 {
                continue;
            }
            let mut path = vec![start];
            let mut current = start;
            loop {
                let successors = graph.successors(current);
                let Some(&(next, _)) = successors.first() else {
                    break;
                };
                if path.contains(&next) {
                    break;
                }
                let qualifies = (lo..=hi).contains(&activity[next as usize])
                    && graph.out_degree(next) == 1;
                path.push(next);
                if !qualifies {
                    break;
                }
                current = next;
            }
            if path.len() >= min_hops {
                chains.push(path);
            }
        }
        chains
    }

    /// Total record activity per node: appearances as sender plus receiver
    /// (a self-loop record counts twice).
    fn activity_counts(ctx: &AnalysisContext<'_>) -> Vec<u64> {
        let graph: &FlowGraph = ctx.graph;
        let mut counts = vec![0u64; graph.node_count()];
        for record in ctx.table.iter() {
            counts[graph.resolve(&record.sender_id).expect("interned") as usize] += 1;
            counts[graph.resolve(&record.receiver_id).expect("interned") as usize] += 1;
        }
        counts
    }
}

impl PatternDetector for ShellChainDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    fn scan(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        Ok(Self::compute(ctx))
    }
}
