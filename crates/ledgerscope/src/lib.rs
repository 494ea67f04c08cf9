//! # Ledgerscope
//!
//! Financial-transactions forensic analyzer.
//!
//! Ledgerscope ingests a tabular set of money-movement records and produces
//! a ranked list of suspicious accounts, fraud-ring groupings, and a
//! visualization-ready graph view. The pipeline:
//!
//! 1. **Normalize** raw records (repairing per-row anomalies)
//! 2. **Build** the aggregated directed flow graph
//! 3. **Filter** legitimate hubs and payroll accounts
//! 4. **Sweep** four independent pattern detectors (smurfing, circular
//!    routing, shell chains, temporal activity) in parallel
//! 5. **Fuse** findings into capped per-account risk scores
//! 6. **Cluster** flagged accounts into rings and **project** the
//!    neighborhood subgraph
//!
//! ## Quick start
//!
//! ```rust
//! use ledgerscope::engine::{AnalyzeOptions, ForensicsEngine};
//! use ledgerscope::core::record::{AmountField, RawRecord};
//!
//! let records = vec![RawRecord {
//!     transaction_id: None,
//!     sender_id: Some("acct_a".into()),
//!     receiver_id: Some("acct_b".into()),
//!     amount: Some(AmountField::Number(950.0)),
//!     timestamp: Some("2026-01-15 10:30:00".into()),
//! }];
//!
//! let engine = ForensicsEngine::default();
//! let report = engine.analyze(records, &AnalyzeOptions::default()).unwrap();
//! assert_eq!(report.summary.total_transactions, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod report;

// Re-export the component crates.
pub use ledgerscope_core as core;
pub use ledgerscope_detect as detect;
pub use ledgerscope_graph as graph;

pub use engine::{AnalyzeOptions, ForensicsEngine};
pub use report::{AnalysisReport, AnalysisSummary};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{AnalyzeOptions, ForensicsEngine};
    pub use crate::report::{AnalysisReport, AnalysisSummary};
    pub use ledgerscope_core::prelude::*;
    pub use ledgerscope_detect::{
        AccountDossier, FraudRing, GraphData, SuspiciousAccount,
    };
    pub use ledgerscope_graph::prelude::*;
}

/// Version information.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
