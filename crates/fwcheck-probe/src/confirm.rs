//! Content confirmation for title-matched windows.

use tracing::{debug, trace};

use fwcheck_core::WindowId;

use crate::backend::Desktop;

/// Verifies that a matched window really contains a required substring.
///
/// Title-only matching can hit unrelated windows; confirming against the
/// window's aggregated content suppresses those false positives.
#[derive(Debug, Clone, Default)]
pub struct ContentConfirmer;

impl ContentConfirmer {
    /// Create a confirmer.
    pub fn new() -> Self {
        Self
    }

    /// Whether `window` contains `content_key` (case-insensitive).
    ///
    /// An empty key confirms trivially. The legacy aggregation is tested
    /// first; on a miss or failure the rich aggregation decides. A failure
    /// on the rich side means "not confirmed", never an error.
    pub fn confirms(&self, desktop: &Desktop, window: WindowId, content_key: &str) -> bool {
        let key = content_key.trim();
        if key.is_empty() {
            return true;
        }

        match desktop.legacy().texts(window) {
            Ok(bundle) if bundle.contains_ignore_case(key) => return true,
            Ok(_) => {}
            Err(e) => trace!("{} texts failed for {window}: {e}", desktop.legacy().name()),
        }

        match desktop.rich().texts(window) {
            Ok(bundle) => bundle.contains_ignore_case(key),
            Err(e) => {
                debug!(
                    "{} confirmation failed for {window}: {e}",
                    desktop.rich().name()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockWindow};
    use std::sync::Arc;

    fn desktop(rich: MockBackend, legacy: MockBackend) -> Desktop {
        Desktop::new(Arc::new(rich), Arc::new(legacy))
    }

    #[test]
    fn test_empty_key_always_confirms() {
        let desktop = desktop(MockBackend::new("rich"), MockBackend::new("legacy"));
        let confirmer = ContentConfirmer::new();
        // Window does not even exist; an empty key never looks at it
        assert!(confirmer.confirms(&desktop, WindowId(1), ""));
        assert!(confirmer.confirms(&desktop, WindowId(1), "  "));
    }

    #[test]
    fn test_confirms_via_legacy_first() {
        let legacy = MockBackend::new("legacy")
            .with_window(MockWindow::new(1).with_texts(["Firmware Version : 1"]));
        let rich_counterless = MockBackend::new("rich");
        let rich_counter = rich_counterless.texts_call_counter();
        let desktop = desktop(rich_counterless, legacy);

        let confirmer = ContentConfirmer::new();
        assert!(confirmer.confirms(&desktop, WindowId(1), "firmware version"));
        // Legacy hit short-circuits; the rich backend is never consulted
        assert_eq!(rich_counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_falls_back_to_rich() {
        let legacy = MockBackend::new("legacy")
            .with_window(MockWindow::new(1).with_texts(["frame only"]));
        let rich = MockBackend::new("rich")
            .with_window(MockWindow::new(1).with_texts(["Firmware Version : 1"]));
        let desktop = desktop(rich, legacy);

        let confirmer = ContentConfirmer::new();
        assert!(confirmer.confirms(&desktop, WindowId(1), "Firmware Version"));
    }

    #[test]
    fn test_rich_failure_means_not_confirmed() {
        let legacy = MockBackend::new("legacy")
            .with_window(MockWindow::new(1).with_texts(["frame only"]));
        let rich = MockBackend::new("rich")
            .with_window(MockWindow::new(1).failing_texts());
        let desktop = desktop(rich, legacy);

        let confirmer = ContentConfirmer::new();
        assert!(!confirmer.confirms(&desktop, WindowId(1), "Firmware Version"));
    }

    #[test]
    fn test_not_confirmed_when_neither_backend_has_key() {
        let legacy = MockBackend::new("legacy")
            .with_window(MockWindow::new(1).with_texts(["a"]));
        let rich = MockBackend::new("rich")
            .with_window(MockWindow::new(1).with_texts(["b"]));
        let desktop = desktop(rich, legacy);

        let confirmer = ContentConfirmer::new();
        assert!(!confirmer.confirms(&desktop, WindowId(1), "Firmware Version"));
    }
}
