//! # Ledgerscope Detect
//!
//! The detection suite of the forensic analyzer:
//!
//! - `LegitimacyFilter` - hub/merchant and payroll exemptions
//! - `SmurfingDetection` - fan-in/fan-out sliding-window counterparty counts
//! - `CircularRoutingDetection` - short simple cycles (lengths 3-5)
//! - `ShellChainDetection` - linear chains through low-activity nodes
//! - `TemporalActivityDetection` - transaction bursts and nocturnal activity
//! - `ScoreFusion` - per-account score/tag/explanation assembly
//! - `RingClusterer` - connected-component ring grouping of flagged accounts
//! - `GraphProjection` - visualization subgraph around flagged accounts
//! - `AccountDossier` - per-account behavioral deep-dive

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod cycle;
pub mod dossier;
pub mod fusion;
pub mod legitimacy;
pub mod project;
pub mod rings;
pub mod shell;
pub mod smurfing;
pub mod types;

pub use activity::TemporalActivityDetection;
pub use cycle::CircularRoutingDetection;
pub use dossier::{AccountDossier, AccountRole};
pub use fusion::ScoreFusion;
pub use legitimacy::LegitimacyFilter;
pub use project::GraphProjection;
pub use rings::RingClusterer;
pub use shell::ShellChainDetection;
pub use smurfing::SmurfingDetection;
pub use types::{
    AnalysisContext, DetectorMetadata, Finding, FraudRing, GraphData, GraphEdge, GraphNode,
    PatternCategory, PatternDetector, RecordView, SuspiciousAccount,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::activity::TemporalActivityDetection;
    pub use crate::cycle::CircularRoutingDetection;
    pub use crate::dossier::{AccountDossier, AccountRole};
    pub use crate::fusion::ScoreFusion;
    pub use crate::legitimacy::LegitimacyFilter;
    pub use crate::project::GraphProjection;
    pub use crate::rings::RingClusterer;
    pub use crate::shell::ShellChainDetection;
    pub use crate::smurfing::SmurfingDetection;
    pub use crate::types::*;
}
