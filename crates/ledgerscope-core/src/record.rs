//! Raw and normalized transaction records.
//!
//! The normalizer repairs per-row anomalies instead of raising them: missing
//! endpoints become `"unknown"`, undecipherable amounts become zero, and
//! records whose timestamp cannot be parsed stay in the table (they still
//! contribute to edge aggregates) but are invisible to time-windowed
//! detectors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A raw input record prior to normalization.
///
/// Every field is optional; the normalizer decides what survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Transaction identifier; synthesized when absent.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Sending account id.
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Receiving account id.
    #[serde(default)]
    pub receiver_id: Option<String>,
    /// Transferred amount; may arrive as a number or decorated text.
    #[serde(default)]
    pub amount: Option<AmountField>,
    /// Timestamp text in any of the supported formats.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Amount as it arrives on the wire: a plain number, or text that may carry
/// currency decoration such as `"$1,250.00"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    /// Already-numeric amount.
    Number(f64),
    /// Textual amount, possibly decorated.
    Text(String),
}

/// A normalized transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub transaction_id: String,
    /// Sending account id.
    pub sender_id: String,
    /// Receiving account id.
    pub receiver_id: String,
    /// Transferred amount, always finite and non-negative.
    pub amount: f64,
    /// Parsed timestamp at second precision; `None` when unparseable.
    pub timestamp: Option<NaiveDateTime>,
}

impl Transaction {
    /// Convenience constructor used by tests and benches.
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: f64,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp,
        }
    }
}

/// The normalized record table for one analysis invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordTable {
    records: Vec<Transaction>,
}

impl RecordTable {
    /// Wrap an already-normalized record list.
    #[must_use]
    pub fn new(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    /// The records in input order.
    #[must_use]
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.records.iter()
    }

    /// Iterate only records with a parseable timestamp, in input order.
    pub fn timestamped(&self) -> impl Iterator<Item = (&Transaction, NaiveDateTime)> {
        self.records.iter().filter_map(|r| r.timestamp.map(|t| (r, t)))
    }

    /// Sum of all record amounts.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }
}

/// Timestamp formats accepted by the normalizer, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Repairs and coerces raw records into a [`RecordTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Normalize a stream of raw records.
    ///
    /// Never fails on row content; the only unrecoverable input failures
    /// (unreadable streams, wholly absent columns) are the caller's to
    /// detect before records reach this point.
    pub fn normalize(records: impl IntoIterator<Item = RawRecord>) -> RecordTable {
        let mut out = Vec::new();
        let mut dropped_timestamps = 0usize;

        for (index, raw) in records.into_iter().enumerate() {
            let timestamp = raw
                .timestamp
                .as_deref()
                .and_then(Self::parse_timestamp);
            if timestamp.is_none() {
                dropped_timestamps += 1;
            }
            out.push(Transaction {
                transaction_id: raw
                    .transaction_id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| format!("TX_{index:06}")),
                sender_id: Self::coerce_endpoint(raw.sender_id),
                receiver_id: Self::coerce_endpoint(raw.receiver_id),
                amount: Self::coerce_amount(raw.amount),
                timestamp,
            });
        }

        if dropped_timestamps > 0 {
            tracing::debug!(
                count = dropped_timestamps,
                "records with unparseable timestamps excluded from temporal detectors"
            );
        }
        RecordTable::new(out)
    }

    /// Parse a timestamp in any supported format, truncated to seconds.
    #[must_use]
    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        for fmt in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
                return ts.with_nanosecond(0);
            }
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return ts.naive_utc().with_nanosecond(0);
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }
        None
    }

    fn coerce_endpoint(value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => "unknown".to_string(),
        }
    }

    fn coerce_amount(value: Option<AmountField>) -> f64 {
        let parsed = match value {
            Some(AmountField::Number(n)) => n,
            Some(AmountField::Text(t)) => {
                let cleaned: String = t
                    .chars()
                    .filter(|c| !matches!(c, '$' | ',' | ' '))
                    .collect();
                cleaned.parse::<f64>().unwrap_or(0.0)
            }
            None => 0.0,
        };
        if parsed.is_finite() && parsed > 0.0 {
            parsed
        } else {
            0.0
        }
    }
}
