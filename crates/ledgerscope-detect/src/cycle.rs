//! Circular fund routing detection.

use crate::types::{tags, AnalysisContext, DetectorMetadata, Finding, PatternDetector};
use ledgerscope_core::error::Result;
use ledgerscope_graph::simple_cycles_bounded;

/// Circular routing detector.
///
/// Enumerates simple directed cycles of scored lengths over the subgraph of
/// non-legitimate nodes with total degree above one, then credits every
/// participant. Shorter loops score higher: `+25 x (6 - length)`.
#[derive(Debug, Clone)]
pub struct CircularRoutingDetection {
    metadata: DetectorMetadata,
}

impl Default for CircularRoutingDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl CircularRoutingDetection {
    /// Create a new circular routing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("sweep/circular-routing")
                .with_description("Short simple cycle enumeration and scoring"),
        }
    }

    /// Run the detector over the shared context.
    ///
    /// A node participating in several cycles accumulates one finding per
    /// cycle; fusion caps the total.
    #[must_use]
    pub fn compute(ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let graph = ctx.graph;
        let (min_len, max_len) = ctx.config.cycle_length_range;

        // Legitimacy-aware pruning: a legitimate or degree-<=1 node can be
        // skipped before enumeration without changing scored output.
        let allowed: Vec<bool> = graph
            .node_ids()
            .map(|n| graph.degree(n) > 1 && !ctx.legitimate.contains(graph.label(n)))
            .collect();

        let cycles = simple_cycles_bounded(graph, &allowed, min_len, max_len);
        tracing::debug!(count = cycles.len(), "simple cycles enumerated");

        let mut findings = Vec::new();
        for cycle in cycles {
            let length = cycle.len();
            let delta = 25.0 * (6 - length) as f64;
            for node in cycle {
                findings.push(Finding::new(
                    graph.label(node),
                    tags::cycle(length),
                    delta,
                    format!("Involved in a {length}-step circular fund routing loop."),
                ));
            }
        }
        findings
    }
}

impl PatternDetector for CircularRoutingDetection {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }

    fn scan(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        Ok(Self::compute(ctx))
    }
}
