//! The polling engine: timed discovery with exactly-once handling.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use fwcheck_core::{CheckResult, PollingSettings, Verdict, WindowId};
use fwcheck_probe::Desktop;

use crate::checker::{CheckRequest, Checker};
use crate::sink::ResultSink;

/// Identity set of windows already processed in this polling session.
///
/// Grows monotonically until it exceeds its capacity, then is cleared
/// wholesale. The clear is a memory bound, not a correctness mechanism:
/// a popup still open across the clear gets reprocessed once.
#[derive(Debug)]
pub struct HandledSet {
    seen: HashSet<WindowId>,
    capacity: usize,
}

impl HandledSet {
    /// Create a set that clears itself past `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: HashSet::new(),
            capacity,
        }
    }

    /// Mark a window as handled. Returns false if it already was.
    pub fn mark(&mut self, window: WindowId) -> bool {
        self.seen.insert(window)
    }

    /// Whether a window was already handled.
    pub fn contains(&self, window: WindowId) -> bool {
        self.seen.contains(&window)
    }

    /// Number of handled identities.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.seen.clear();
    }

    /// Clear the set when it has grown past capacity. Returns true if a
    /// clear happened.
    pub fn evict_if_overgrown(&mut self) -> bool {
        if self.seen.len() > self.capacity {
            self.seen.clear();
            true
        } else {
            false
        }
    }
}

/// Handle for stopping a running poll from elsewhere.
#[derive(Debug, Clone)]
pub struct PollControl {
    running: Arc<AtomicBool>,
}

impl PollControl {
    /// Request the poll to stop. Takes effect at the next tick boundary:
    /// a tick already underway completes, no further tick starts.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the poll is (still) running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Timed polling engine over the check pipeline.
///
/// The handled set and running flag live here; background sinks never touch
/// them. Rescheduling is fixed-delay: the interval is measured from tick
/// completion, so a slow tick stretches the effective period.
pub struct Poller {
    desktop: Desktop,
    checker: Checker,
    interval: Duration,
    handled: HandledSet,
    running: Arc<AtomicBool>,
}

impl Poller {
    /// Create an idle poller.
    pub fn new(desktop: Desktop, checker: Checker, settings: &PollingSettings) -> Self {
        Self {
            desktop,
            checker,
            interval: Duration::from_millis(settings.interval_ms),
            handled: HandledSet::new(settings.handled_capacity),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Control handle for this poller.
    pub fn control(&self) -> PollControl {
        PollControl {
            running: Arc::clone(&self.running),
        }
    }

    /// Number of identities currently marked handled.
    pub fn handled_len(&self) -> usize {
        self.handled.len()
    }

    /// Transition to running: clears the handled set from any previous
    /// session, then raises the flag.
    pub fn start(&mut self) {
        self.handled.clear();
        self.running.store(true, Ordering::SeqCst);
        info!("polling started (interval {:?})", self.interval);
    }

    /// One poll pass over the currently located windows.
    ///
    /// Every window not yet in the handled set is marked *before* it is
    /// processed, so a slow or failing extraction can never cause
    /// reprocessing. Results come back in enumeration order.
    pub fn tick(&mut self, request: &CheckRequest) -> Vec<CheckResult> {
        let mut results = Vec::new();

        for window in self.checker.locate(&self.desktop, request) {
            if !self.handled.mark(window) {
                continue;
            }

            if request.input_version.is_empty() {
                results.push(CheckResult::new(
                    &request.input_version,
                    None,
                    Verdict::Error,
                    "Input version is empty.",
                ));
                continue;
            }

            if request.needs_confirmation()
                && !self.checker.confirm(&self.desktop, request, window)
            {
                results.push(CheckResult::new(
                    &request.input_version,
                    None,
                    Verdict::Skip,
                    format!(
                        "New popup title matched but missing content '{}' (skip).",
                        request.content_key
                    ),
                ));
                continue;
            }

            let result = match self.checker.read_version(&self.desktop, window) {
                Some(version) => CheckResult::compare(&request.input_version, &version),
                None => CheckResult::new(
                    &request.input_version,
                    None,
                    Verdict::NotFound,
                    "Cannot read firmware version from target popup.",
                ),
            };
            results.push(result);
        }

        if self.handled.evict_if_overgrown() {
            debug!("handled set exceeded capacity, cleared");
        }

        results
    }

    /// Run the poll loop until the control handle stops it.
    ///
    /// Each tick's results are published to `sink` with the modal flag off;
    /// automatic checks never interrupt the operator.
    pub async fn run(&mut self, request: &CheckRequest, sink: &dyn ResultSink) {
        if !self.running.load(Ordering::SeqCst) {
            self.start();
        }

        loop {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            for result in self.tick(request) {
                sink.publish(&result, false);
            }

            tokio::time::sleep(self.interval).await;
        }

        info!("polling stopped");
    }
}
