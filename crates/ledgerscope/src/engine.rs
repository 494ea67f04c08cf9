//! The forensic analysis pipeline.

use crate::report::{AnalysisReport, AnalysisSummary};
use ledgerscope_core::config::AnalysisConfig;
use ledgerscope_core::error::{EngineError, Result};
use ledgerscope_core::progress::{CancelFlag, ProgressReporter};
use ledgerscope_core::record::{Normalizer, RawRecord, RecordTable};
use ledgerscope_core::stats;
use ledgerscope_detect::{
    AnalysisContext, CircularRoutingDetection, Finding, GraphProjection, LegitimacyFilter,
    PatternDetector, RingClusterer, ScoreFusion, ShellChainDetection, SmurfingDetection,
    TemporalActivityDetection,
};
use ledgerscope_graph::FlowGraph;
use rayon::prelude::*;
use std::time::Instant;

/// Per-invocation knobs: progress reporting and cooperative cancellation.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Phase-boundary progress reporter.
    pub progress: ProgressReporter,
    /// Cancellation flag checked between phases.
    pub cancel: CancelFlag,
}

impl AnalyzeOptions {
    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Attach a cancellation flag.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

/// The forensic analysis engine.
///
/// One engine holds one validated configuration; every `analyze` call is an
/// independent invocation whose record table and graph are released when
/// the report is returned.
#[derive(Debug, Clone)]
pub struct ForensicsEngine {
    config: AnalysisConfig,
}

impl Default for ForensicsEngine {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
}

impl ForensicsEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Normalize raw records and analyze them.
    pub fn analyze(&self, records: Vec<RawRecord>, options: &AnalyzeOptions) -> Result<AnalysisReport> {
        options.progress.report("Normalizing records...", 0.05);
        let table = Normalizer::normalize(records);
        self.analyze_table(table, options)
    }

    /// Analyze an already-normalized record table.
    pub fn analyze_table(
        &self,
        table: RecordTable,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisReport> {
        let started = Instant::now();
        if table.is_empty() {
            options.progress.report("Analysis complete.", 1.0);
            return Ok(AnalysisReport::empty());
        }

        Self::checkpoint(options)?;
        options.progress.report("Building graph topology...", 0.15);
        let graph = FlowGraph::from_records(&table);
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            records = table.len(),
            "flow graph constructed"
        );
        options.progress.report("Graph constructed.", 0.25);

        Self::checkpoint(options)?;
        options.progress.report("Filtering legitimate entities...", 0.35);
        let legitimate = LegitimacyFilter::compute(&table, &self.config);

        Self::checkpoint(options)?;
        options
            .progress
            .report("Executing parallel forensic sweep...", 0.5);
        let ctx = AnalysisContext::new(&table, &graph, &legitimate, &self.config);
        let detectors: Vec<Box<dyn PatternDetector>> = vec![
            Box::new(SmurfingDetection::new()),
            Box::new(CircularRoutingDetection::new()),
            Box::new(ShellChainDetection::new()),
            Box::new(TemporalActivityDetection::new()),
        ];
        let (findings, failed) = Self::sweep(&detectors, &ctx);

        Self::checkpoint(options)?;
        options.progress.report("Fusing detector findings...", 0.7);
        let mut accounts = ScoreFusion::compute(&findings, &ctx);

        Self::checkpoint(options)?;
        options.progress.report("Clustering fraud rings...", 0.8);
        let rings = RingClusterer::compute(&mut accounts, &graph);

        options.progress.report("Projecting graph view...", 0.9);
        let graph_data = GraphProjection::compute(&accounts, &legitimate, &graph);

        let avg = stats::mean(
            &accounts
                .iter()
                .map(|a| a.suspicion_score)
                .collect::<Vec<_>>(),
        );
        let summary = AnalysisSummary {
            total_accounts_analyzed: graph.node_count(),
            total_transactions: table.len(),
            suspicious_accounts_flagged: accounts.len(),
            fraud_rings_detected: rings.len(),
            avg_risk_score: stats::round2(avg),
            processing_time_seconds: stats::round2(started.elapsed().as_secs_f64()),
            detectors_failed: failed,
        };
        tracing::info!(
            flagged = summary.suspicious_accounts_flagged,
            rings = summary.fraud_rings_detected,
            "analysis complete"
        );
        options.progress.report("Analysis complete.", 1.0);

        Ok(AnalysisReport {
            suspicious_accounts: accounts,
            fraud_rings: rings,
            graph_data,
            summary,
        })
    }

    /// Run the detectors in parallel over the shared read-only context.
    ///
    /// Output order matches detector order regardless of completion order,
    /// so fusion always observes complete sets in a fixed sequence. A
    /// failing detector is dropped and recorded; the rest still fuse.
    fn sweep(
        detectors: &[Box<dyn PatternDetector>],
        ctx: &AnalysisContext<'_>,
    ) -> (Vec<Vec<Finding>>, Vec<String>) {
        let outcomes: Vec<(String, Result<Vec<Finding>>)> = detectors
            .par_iter()
            .map(|detector| (detector.id().to_string(), detector.scan(ctx)))
            .collect();

        let mut findings = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(batch) => {
                    tracing::debug!(detector = %id, findings = batch.len(), "detector finished");
                    findings.push(batch);
                }
                Err(err) => {
                    tracing::warn!(detector = %id, error = %err, "detector failed; continuing degraded");
                    failed.push(id);
                }
            }
        }
        (findings, failed)
    }

    fn checkpoint(options: &AnalyzeOptions) -> Result<()> {
        if options.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }
}
