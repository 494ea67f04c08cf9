//! Analysis configuration.
//!
//! All detection thresholds are tunable; the defaults reproduce the
//! canonical behavior of the detectors described in the crate docs.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Width of the fan-in/fan-out sliding window, in hours.
    pub smurfing_window_hours: i64,
    /// Distinct-counterparty count that triggers a smurfing finding.
    pub smurfing_threshold: usize,
    /// Minimum chain length (node count) for a shell chain to be emitted.
    pub shell_min_hops: usize,
    /// Inclusive total-activity range qualifying a shell chain intermediary.
    pub shell_activity_range: (u64, u64),
    /// Inclusive range of simple-cycle lengths that are scored.
    pub cycle_length_range: (usize, usize),
    /// Minimum outgoing records for an account to enter burst analysis.
    pub burst_sender_min_records: usize,
    /// Hours of day (0-23) counted as night.
    pub nocturnal_hours: Vec<u32>,
    /// Night-share percentage above which nocturnal activity is flagged.
    pub nocturnal_threshold_pct: f64,
    /// Distinct-sender count for hub/merchant candidacy.
    pub hub_min_senders: usize,
    /// Coefficient-of-variation bound for hub daily-volume stability.
    pub hub_cv_threshold: f64,
    /// Minimum records on an ordered pair for payroll candidacy.
    pub payroll_min_records: usize,
    /// Inclusive whole-day gap range for payroll cadence.
    pub payroll_gap_days: (i64, i64),
    /// Coefficient-of-variation bound for payroll amount stability.
    pub payroll_amount_cv: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            smurfing_window_hours: 72,
            smurfing_threshold: 10,
            shell_min_hops: 4,
            shell_activity_range: (2, 3),
            cycle_length_range: (3, 5),
            burst_sender_min_records: 6,
            nocturnal_hours: vec![23, 0, 1, 2, 3, 4],
            nocturnal_threshold_pct: 40.0,
            hub_min_senders: 50,
            hub_cv_threshold: 0.7,
            payroll_min_records: 3,
            payroll_gap_days: (25, 35),
            payroll_amount_cv: 0.05,
        }
    }
}

impl AnalysisConfig {
    /// Set the smurfing window width in hours.
    #[must_use]
    pub fn with_smurfing_window_hours(mut self, hours: i64) -> Self {
        self.smurfing_window_hours = hours;
        self
    }

    /// Set the distinct-counterparty smurfing threshold.
    #[must_use]
    pub fn with_smurfing_threshold(mut self, threshold: usize) -> Self {
        self.smurfing_threshold = threshold;
        self
    }

    /// Set the minimum shell chain length.
    #[must_use]
    pub fn with_shell_min_hops(mut self, hops: usize) -> Self {
        self.shell_min_hops = hops;
        self
    }

    /// Set the inclusive shell intermediary activity range.
    #[must_use]
    pub fn with_shell_activity_range(mut self, lo: u64, hi: u64) -> Self {
        self.shell_activity_range = (lo, hi);
        self
    }

    /// Set the inclusive scored cycle length range.
    #[must_use]
    pub fn with_cycle_length_range(mut self, lo: usize, hi: usize) -> Self {
        self.cycle_length_range = (lo, hi);
        self
    }

    /// Set the minimum outgoing record count for burst analysis.
    #[must_use]
    pub fn with_burst_sender_min_records(mut self, min: usize) -> Self {
        self.burst_sender_min_records = min;
        self
    }

    /// Set the night-hour set.
    #[must_use]
    pub fn with_nocturnal_hours(mut self, hours: Vec<u32>) -> Self {
        self.nocturnal_hours = hours;
        self
    }

    /// Set the nocturnal flagging threshold percentage.
    #[must_use]
    pub fn with_nocturnal_threshold_pct(mut self, pct: f64) -> Self {
        self.nocturnal_threshold_pct = pct;
        self
    }

    /// Set the hub/merchant distinct-sender minimum.
    #[must_use]
    pub fn with_hub_min_senders(mut self, min: usize) -> Self {
        self.hub_min_senders = min;
        self
    }

    /// Set the hub daily-volume stability bound.
    #[must_use]
    pub fn with_hub_cv_threshold(mut self, cv: f64) -> Self {
        self.hub_cv_threshold = cv;
        self
    }

    /// Set the payroll record minimum, gap range, and amount stability bound.
    #[must_use]
    pub fn with_payroll_rule(mut self, min_records: usize, gap_days: (i64, i64), cv: f64) -> Self {
        self.payroll_min_records = min_records;
        self.payroll_gap_days = gap_days;
        self.payroll_amount_cv = cv;
        self
    }

    /// Returns true when `hour` (0-23) falls in the configured night set.
    #[must_use]
    pub fn is_night_hour(&self, hour: u32) -> bool {
        self.nocturnal_hours.contains(&hour)
    }

    /// Validate the configuration.
    ///
    /// Rejects empty or inverted ranges and non-positive thresholds; called
    /// by the engine before an analysis starts.
    pub fn validate(&self) -> Result<()> {
        if self.smurfing_window_hours <= 0 {
            return Err(EngineError::invalid_config(
                "smurfing_window_hours must be positive",
            ));
        }
        if self.smurfing_threshold == 0 {
            return Err(EngineError::invalid_config(
                "smurfing_threshold must be at least 1",
            ));
        }
        if self.shell_min_hops < 2 {
            return Err(EngineError::invalid_config(
                "shell_min_hops must be at least 2",
            ));
        }
        if self.shell_activity_range.0 > self.shell_activity_range.1 {
            return Err(EngineError::invalid_config(
                "shell_activity_range is inverted",
            ));
        }
        if self.cycle_length_range.0 < 2 || self.cycle_length_range.0 > self.cycle_length_range.1 {
            return Err(EngineError::invalid_config(
                "cycle_length_range must be an ascending range starting at 2 or above",
            ));
        }
        if self.payroll_min_records < 2 {
            return Err(EngineError::invalid_config(
                "payroll_min_records must be at least 2",
            ));
        }
        if self.payroll_gap_days.0 > self.payroll_gap_days.1 {
            return Err(EngineError::invalid_config("payroll_gap_days is inverted"));
        }
        if !(0.0..=100.0).contains(&self.nocturnal_threshold_pct) {
            return Err(EngineError::invalid_config(
                "nocturnal_threshold_pct must be within [0, 100]",
            ));
        }
        if self.nocturnal_hours.iter().any(|&h| h > 23) {
            return Err(EngineError::invalid_config(
                "nocturnal_hours entries must be within [0, 23]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let cfg = AnalysisConfig::default()
            .with_smurfing_threshold(5)
            .with_shell_min_hops(3)
            .with_hub_min_senders(10);

        assert_eq!(cfg.smurfing_threshold, 5);
        assert_eq!(cfg.shell_min_hops, 3);
        assert_eq!(cfg.hub_min_senders, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let cfg = AnalysisConfig::default().with_shell_activity_range(4, 2);
        assert!(cfg.validate().is_err());

        let cfg = AnalysisConfig::default().with_cycle_length_range(5, 3);
        assert!(cfg.validate().is_err());

        let cfg = AnalysisConfig::default().with_smurfing_window_hours(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_night_hour_lookup() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.is_night_hour(23));
        assert!(cfg.is_night_hour(0));
        assert!(cfg.is_night_hour(4));
        assert!(!cfg.is_night_hour(5));
        assert!(!cfg.is_night_hour(12));
    }
}
