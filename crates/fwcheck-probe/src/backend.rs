//! Accessibility backend abstraction.

use std::sync::Arc;

use tracing::warn;

use fwcheck_core::{Result, TextBundle, WindowId};

/// One accessibility surface over the desktop's window tree.
///
/// Implementations treat every individual property read as fallible and
/// absorb those failures internally: a vanished element or an unsupported
/// property skips that one value, never the rest of the collection. The
/// trait surface only reports failure at whole-window granularity (window
/// gone, backend not reachable).
pub trait AccessBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Currently visible top-level windows, in OS enumeration order.
    fn windows(&self) -> Result<Vec<WindowId>>;

    /// Visible title of a window.
    fn title(&self, window: WindowId) -> Result<String>;

    /// Every text string reachable from the window through this backend,
    /// deduplicated and blank-filtered.
    fn texts(&self, window: WindowId) -> Result<TextBundle>;
}

/// The pair of independent backends the checker works with.
///
/// The legacy backend owns window enumeration (it sees plain top-level
/// windows); the rich backend is attached per window for deeper reads.
#[derive(Clone)]
pub struct Desktop {
    rich: Arc<dyn AccessBackend>,
    legacy: Arc<dyn AccessBackend>,
}

impl Desktop {
    /// Pair a rich and a legacy backend.
    pub fn new(rich: Arc<dyn AccessBackend>, legacy: Arc<dyn AccessBackend>) -> Self {
        Self { rich, legacy }
    }

    /// Rich hierarchical backend (UI Automation on Windows).
    pub fn rich(&self) -> &dyn AccessBackend {
        self.rich.as_ref()
    }

    /// Legacy window-tree backend (Win32 on Windows).
    pub fn legacy(&self) -> &dyn AccessBackend {
        self.legacy.as_ref()
    }

    /// Visible top-level windows via the legacy backend.
    ///
    /// Enumeration failure yields an empty list; the polling loop must
    /// outlive any single bad tick.
    pub fn visible_windows(&self) -> Vec<WindowId> {
        match self.legacy.windows() {
            Ok(windows) => windows,
            Err(e) => {
                warn!("window enumeration failed on {}: {e}", self.legacy.name());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockWindow};

    #[test]
    fn test_visible_windows_in_enumeration_order() {
        let legacy = MockBackend::new("legacy")
            .with_window(MockWindow::new(3))
            .with_window(MockWindow::new(1))
            .with_window(MockWindow::new(2));
        let desktop = Desktop::new(Arc::new(MockBackend::new("rich")), Arc::new(legacy));

        let ids: Vec<_> = desktop.visible_windows();
        assert_eq!(ids, vec![WindowId(3), WindowId(1), WindowId(2)]);
    }

    #[test]
    fn test_visible_windows_absorbs_enumeration_failure() {
        let legacy = MockBackend::new("legacy").failing_enumeration();
        let desktop = Desktop::new(Arc::new(MockBackend::new("rich")), Arc::new(legacy));

        assert!(desktop.visible_windows().is_empty());
    }
}
