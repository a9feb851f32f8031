//! Window location by title or aggregated content.

use tracing::trace;

use fwcheck_core::WindowId;

use crate::backend::Desktop;

/// Locates candidate popup windows among the visible top-level windows.
///
/// Two mutually exclusive discovery modes:
/// - by title: case-insensitive substring over window titles, no scan limit
/// - by content: case-insensitive substring over each window's aggregated
///   text, probing the legacy backend first and retrying with the rich
///   backend, capped at `max_content_scan` windows per scan
///
/// Matches are returned in enumeration order. A blank key yields no matches
/// in either mode.
#[derive(Debug, Clone)]
pub struct WindowLocator {
    max_content_scan: usize,
}

impl WindowLocator {
    /// Create a locator with the given content-scan cap.
    pub fn new(max_content_scan: usize) -> Self {
        Self { max_content_scan }
    }

    /// Windows whose title contains `title_key` (case-insensitive).
    ///
    /// A window whose title cannot be read is skipped, not matched.
    pub fn by_title(&self, desktop: &Desktop, title_key: &str) -> Vec<WindowId> {
        let key = title_key.trim().to_lowercase();
        if key.is_empty() {
            return Vec::new();
        }

        let mut matched = Vec::new();
        for id in desktop.visible_windows() {
            let title = match desktop.legacy().title(id) {
                Ok(title) => title,
                Err(e) => {
                    trace!("skipping {id}: title unreadable: {e}");
                    continue;
                }
            };
            if title.trim().to_lowercase().contains(&key) {
                matched.push(id);
            }
        }
        matched
    }

    /// Windows whose aggregated text contains `content_key`
    /// (case-insensitive).
    ///
    /// At most `max_content_scan` windows are examined, regardless of how
    /// many matched. Per window, the legacy aggregation is tested first; if
    /// it fails or finds nothing, the rich aggregation gets one retry before
    /// the window is given up on.
    pub fn by_content(&self, desktop: &Desktop, content_key: &str) -> Vec<WindowId> {
        let key = content_key.trim();
        if key.is_empty() {
            return Vec::new();
        }

        let mut matched = Vec::new();
        for id in desktop
            .visible_windows()
            .into_iter()
            .take(self.max_content_scan)
        {
            match desktop.legacy().texts(id) {
                Ok(bundle) if bundle.contains_ignore_case(key) => {
                    matched.push(id);
                    continue;
                }
                Ok(_) => {}
                Err(e) => trace!("{} texts failed for {id}: {e}", desktop.legacy().name()),
            }

            match desktop.rich().texts(id) {
                Ok(bundle) if bundle.contains_ignore_case(key) => matched.push(id),
                Ok(_) => {}
                Err(e) => trace!("{} texts failed for {id}: {e}", desktop.rich().name()),
            }
        }
        matched
    }
}
