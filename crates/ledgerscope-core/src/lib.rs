//! # Ledgerscope Core
//!
//! Core abstractions for the ledgerscope forensic analyzer.
//!
//! This crate provides:
//! - Raw and normalized transaction records plus the normalizer
//! - Analysis configuration with tunable detection thresholds
//! - Error types shared across the pipeline
//! - Progress reporting and cooperative cancellation
//! - Shared statistics helpers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod progress;
pub mod record;
pub mod stats;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::error::{EngineError, Result};
    pub use crate::progress::{CancelFlag, ProgressReporter};
    pub use crate::record::{AmountField, Normalizer, RawRecord, RecordTable, Transaction};
}
