//! Legitimate-entity filtering.
//!
//! Both rules model stability. Smurfing and burst patterns are inherently
//! unstable, so legitimacy acts as a pre-emptive suppressor: a matching
//! account never reaches the flagged list, whatever the detectors say.

use chrono::{NaiveDate, NaiveDateTime};
use ledgerscope_core::config::AnalysisConfig;
use ledgerscope_core::record::RecordTable;
use ledgerscope_core::stats;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Identifies hub/merchant and payroll accounts exempt from flagging.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegitimacyFilter;

impl LegitimacyFilter {
    /// Compute the set of legitimate account ids.
    ///
    /// Union of the hub/merchant rule and the payroll rule. Records without
    /// a parseable timestamp still count toward distinct-sender totals but
    /// carry no cadence information, so they stay out of every daily or
    /// gap computation.
    #[must_use]
    pub fn compute(table: &RecordTable, config: &AnalysisConfig) -> HashSet<String> {
        let mut legitimate = HashSet::new();
        Self::hub_rule(table, config, &mut legitimate);
        Self::payroll_rule(table, config, &mut legitimate);
        if !legitimate.is_empty() {
            tracing::debug!(count = legitimate.len(), "legitimate entities identified");
        }
        legitimate
    }

    /// Hub/merchant rule: many distinct senders AND stable daily incoming
    /// volume. Daily buckets are zero-filled across the receiver's own
    /// observed calendar-day range; a single observed day can never
    /// establish stability.
    fn hub_rule(table: &RecordTable, config: &AnalysisConfig, legitimate: &mut HashSet<String>) {
        let mut senders: HashMap<&str, HashSet<&str>> = HashMap::new();
        let mut daily: HashMap<&str, BTreeMap<NaiveDate, u64>> = HashMap::new();

        for record in table.iter() {
            senders
                .entry(&record.receiver_id)
                .or_default()
                .insert(&record.sender_id);
        }
        for (record, ts) in table.timestamped() {
            *daily
                .entry(&record.receiver_id)
                .or_default()
                .entry(ts.date())
                .or_insert(0) += 1;
        }

        for (receiver, distinct) in &senders {
            if distinct.len() < config.hub_min_senders {
                continue;
            }
            let Some(buckets) = daily.get(receiver) else {
                continue;
            };
            let (&first, _) = buckets.first_key_value().expect("candidate has records");
            let (&last, _) = buckets.last_key_value().expect("candidate has records");
            if first == last {
                continue;
            }
            let counts: Vec<f64> = Self::zero_filled_days(buckets, first, last);
            let mean = stats::mean(&counts);
            if stats::pop_stddev(&counts) < mean * config.hub_cv_threshold {
                legitimate.insert((*receiver).to_string());
            }
        }
    }

    fn zero_filled_days(buckets: &BTreeMap<NaiveDate, u64>, first: NaiveDate, last: NaiveDate) -> Vec<f64> {
        let span = (last - first).num_days() as usize + 1;
        let mut counts = vec![0.0; span];
        for (&day, &count) in buckets {
            counts[(day - first).num_days() as usize] = count as f64;
        }
        counts
    }

    /// Payroll rule: an ordered pair paying on a monthly cadence with
    /// near-constant amounts marks the receiver legitimate.
    fn payroll_rule(table: &RecordTable, config: &AnalysisConfig, legitimate: &mut HashSet<String>) {
        let mut pairs: HashMap<(&str, &str), Vec<(NaiveDateTime, f64)>> = HashMap::new();
        for (record, ts) in table.timestamped() {
            pairs
                .entry((&record.sender_id, &record.receiver_id))
                .or_default()
                .push((ts, record.amount));
        }

        for ((_, receiver), mut records) in pairs {
            if records.len() < config.payroll_min_records {
                continue;
            }
            records.sort_by_key(|(ts, _)| *ts);

            let (lo, hi) = config.payroll_gap_days;
            let cadenced = records.windows(2).all(|w| {
                let gap = (w[1].0 - w[0].0).num_days();
                (lo..=hi).contains(&gap)
            });
            if !cadenced {
                continue;
            }

            let amounts: Vec<f64> = records.iter().map(|(_, a)| *a).collect();
            let mean = stats::mean(&amounts);
            if stats::sample_stddev(&amounts) < mean * config.payroll_amount_cv {
                legitimate.insert(receiver.to_string());
            }
        }
    }
}
