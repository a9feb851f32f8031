//! Result sinks.

use std::sync::Arc;

use fwcheck_core::CheckResult;

/// Consumer of check results.
///
/// `modal` distinguishes a manual single check (always surfaced to the
/// operator) from an automatic batch check (reported quietly). Sinks must
/// not block the polling loop; slow work is dispatched in the background.
pub trait ResultSink: Send + Sync {
    /// Receive one result.
    fn publish(&self, result: &CheckResult, modal: bool);
}

/// Fans one result out to several sinks, in registration order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ResultSink>>,
}

impl FanoutSink {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink.
    pub fn push(&mut self, sink: Arc<dyn ResultSink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink is registered.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultSink for FanoutSink {
    fn publish(&self, result: &CheckResult, modal: bool) {
        for sink in &self.sinks {
            sink.publish(result, modal);
        }
    }
}
