// Metrics hooks for the matching layer.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`];
// every call to `MatchService::match_string` then reports its latency and
// outcome. Keeps instrumentation decoupled from any metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// How a single match call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The model named a candidate.
    Matched,
    /// The model declined to pick a candidate.
    NoMatch,
    /// Prompt building or model invocation failed.
    Failed,
}

/// Metrics observer for match operations.
pub trait MatchMetrics: Send + Sync {
    /// Record one match call.
    ///
    /// `model` is `"mock"` or `"remote"` for the configured backend and
    /// `"injected"` for `MatchService::match_with_model`. `latency` is the
    /// wall-clock time spent building the prompt and waiting on the model.
    fn record_match(&self, model: &'static str, latency: Duration, outcome: MatchOutcome);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
