//! Progress reporting and cooperative cancellation.
//!
//! The pipeline reports at phase boundaries only; fractions are monotone
//! within one analysis. Cancellation is cooperative: the engine checks the
//! flag between phases and never publishes partial findings.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback invoked at phase boundaries with a label and a completed
/// fraction in `[0, 1]`.
pub type ProgressFn = dyn Fn(&str, f64) + Send + Sync;

/// Phase-boundary progress reporter; a no-op unless a callback is installed.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<Arc<ProgressFn>>,
}

impl ProgressReporter {
    /// Create a reporter around a callback.
    pub fn new(callback: impl Fn(&str, f64) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// A reporter that discards every report.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Report a phase boundary.
    pub fn report(&self, label: &str, fraction: f64) {
        if let Some(cb) = &self.callback {
            cb(label, fraction.clamp(0.0, 1.0));
        }
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("installed", &self.callback.is_some())
            .finish()
    }
}

/// Cooperative cancellation flag checked between pipeline phases.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_reporter_invokes_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = ProgressReporter::new(move |label, fraction| {
            sink.lock().unwrap().push((label.to_string(), fraction));
        });

        reporter.report("load", 0.1);
        reporter.report("sweep", 1.5); // clamped

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("load".to_string(), 0.1));
        assert_eq!(seen[1].1, 1.0);
    }

    #[test]
    fn test_none_reporter_is_silent() {
        ProgressReporter::none().report("anything", 0.5);
    }

    #[test]
    fn test_cancel_flag_propagates_between_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }
}
