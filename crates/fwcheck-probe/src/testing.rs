//! Scriptable mock backend for tests.
//!
//! Lets tests stage a desktop of fake windows with per-window text and
//! scripted failures, and observe how many windows a scan actually probed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fwcheck_core::{Error, Result, TextBundle, WindowId};

use crate::backend::AccessBackend;

/// One staged window.
#[derive(Debug, Clone)]
pub struct MockWindow {
    /// Window identity
    pub id: WindowId,
    /// Title; `None` makes title reads fail
    pub title: Option<String>,
    /// Texts returned by `texts()`; `None` makes the whole read fail
    pub texts: Option<Vec<String>>,
}

impl MockWindow {
    /// A window with an empty title and no text.
    pub fn new(id: isize) -> Self {
        Self {
            id: WindowId(id),
            title: Some(String::new()),
            texts: Some(Vec::new()),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Make title reads fail for this window.
    pub fn failing_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Set the texts returned for this window.
    pub fn with_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts = Some(texts.into_iter().map(Into::into).collect());
        self
    }

    /// Make text collection fail for this window.
    pub fn failing_texts(mut self) -> Self {
        self.texts = None;
        self
    }
}

/// Mock accessibility backend backed by staged windows.
pub struct MockBackend {
    name: &'static str,
    windows: Vec<MockWindow>,
    fail_enumeration: bool,
    texts_calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create an empty mock backend.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            windows: Vec::new(),
            fail_enumeration: false,
            texts_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stage a window. Enumeration order follows staging order.
    pub fn with_window(mut self, window: MockWindow) -> Self {
        self.windows.push(window);
        self
    }

    /// Stage `count` windows with the given title.
    pub fn with_windows(mut self, count: usize, title: &str) -> Self {
        let base = self.windows.len() as isize;
        for i in 0..count as isize {
            self.windows.push(MockWindow::new(base + i + 1).with_title(title));
        }
        self
    }

    /// Make `windows()` fail.
    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// Counter of `texts()` calls, shared with clones handed to a `Desktop`.
    pub fn texts_call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.texts_calls)
    }

    fn find(&self, id: WindowId) -> Result<&MockWindow> {
        self.windows
            .iter()
            .find(|w| w.id == id)
            .ok_or(Error::WindowGone(id))
    }
}

impl AccessBackend for MockBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn windows(&self) -> Result<Vec<WindowId>> {
        if self.fail_enumeration {
            return Err(Error::BackendUnavailable(format!(
                "{} enumeration scripted to fail",
                self.name
            )));
        }
        Ok(self.windows.iter().map(|w| w.id).collect())
    }

    fn title(&self, window: WindowId) -> Result<String> {
        self.find(window)?
            .title
            .clone()
            .ok_or(Error::WindowGone(window))
    }

    fn texts(&self, window: WindowId) -> Result<TextBundle> {
        self.texts_calls.fetch_add(1, Ordering::SeqCst);
        let staged = self.find(window)?;
        match &staged.texts {
            Some(texts) => Ok(texts.iter().collect()),
            None => Err(Error::WindowGone(window)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_enumeration() {
        let backend = MockBackend::new("mock")
            .with_window(MockWindow::new(1))
            .with_window(MockWindow::new(2));
        assert_eq!(
            backend.windows().unwrap(),
            vec![WindowId(1), WindowId(2)]
        );
    }

    #[test]
    fn test_mock_backend_scripted_failures() {
        let backend = MockBackend::new("mock")
            .with_window(MockWindow::new(1).failing_title().failing_texts());

        assert!(backend.title(WindowId(1)).is_err());
        assert!(backend.texts(WindowId(1)).is_err());
        assert!(backend.title(WindowId(99)).is_err());
    }

    #[test]
    fn test_mock_backend_counts_text_reads() {
        let backend = MockBackend::new("mock").with_window(MockWindow::new(1));
        let counter = backend.texts_call_counter();

        let _ = backend.texts(WindowId(1));
        let _ = backend.texts(WindowId(1));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mock_texts_are_bundled() {
        let backend = MockBackend::new("mock")
            .with_window(MockWindow::new(1).with_texts(["a", "", "a", " b "]));

        let bundle = backend.texts(WindowId(1)).unwrap();
        let entries: Vec<_> = bundle.iter().collect();
        assert_eq!(entries, vec!["a", "b"]);
    }
}
