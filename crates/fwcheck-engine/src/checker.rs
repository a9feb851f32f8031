//! The check pipeline: locate, confirm, extract, compare.

use fwcheck_core::{CheckResult, CheckerConfig, Result, Verdict, VersionPattern, WindowId};
use fwcheck_probe::{ContentConfirmer, Desktop, VersionExtractor, WindowLocator};

/// Read-only snapshot of the operator's inputs for one check or tick.
///
/// Taken once at the start of a check; a running poll never sees a
/// half-updated key set.
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    /// Expected firmware version
    pub input_version: String,
    /// Title substring key (title mode when non-empty)
    pub title_key: String,
    /// Content substring key (content mode, and the confirmation key)
    pub content_key: String,
}

impl CheckRequest {
    /// Build a request, trimming every field.
    pub fn new(
        input_version: impl AsRef<str>,
        title_key: impl AsRef<str>,
        content_key: impl AsRef<str>,
    ) -> Self {
        Self {
            input_version: input_version.as_ref().trim().to_string(),
            title_key: title_key.as_ref().trim().to_string(),
            content_key: content_key.as_ref().trim().to_string(),
        }
    }

    /// Whether title-mode discovery is configured.
    pub fn has_title_key(&self) -> bool {
        !self.title_key.is_empty()
    }

    /// Whether content-mode discovery (or confirmation) is configured.
    pub fn has_content_key(&self) -> bool {
        !self.content_key.is_empty()
    }

    /// Title matching needs a content confirmation pass when both keys are
    /// set; content-mode discovery already proves containment.
    pub fn needs_confirmation(&self) -> bool {
        self.has_title_key() && self.has_content_key()
    }
}

/// Orchestrates one window's journey through the pipeline.
pub struct Checker {
    locator: WindowLocator,
    confirmer: ContentConfirmer,
    extractor: VersionExtractor,
}

impl Checker {
    /// Build a checker from configuration.
    pub fn from_config(config: &CheckerConfig) -> Result<Self> {
        let pattern = VersionPattern::new(&config.target.version_pattern)?;
        Ok(Self {
            locator: WindowLocator::new(config.target.max_content_scan),
            confirmer: ContentConfirmer::new(),
            extractor: VersionExtractor::new(pattern),
        })
    }

    /// Candidate windows for the request, in enumeration order.
    ///
    /// Title mode wins when both keys are set; content mode is the
    /// fallback; no key at all locates nothing.
    pub fn locate(&self, desktop: &Desktop, request: &CheckRequest) -> Vec<WindowId> {
        if request.has_title_key() {
            self.locator.by_title(desktop, &request.title_key)
        } else if request.has_content_key() {
            self.locator.by_content(desktop, &request.content_key)
        } else {
            Vec::new()
        }
    }

    /// Confirmation pass for a title-matched window.
    pub fn confirm(&self, desktop: &Desktop, request: &CheckRequest, window: WindowId) -> bool {
        self.confirmer.confirms(desktop, window, &request.content_key)
    }

    /// Version extraction through the backend chain.
    pub fn read_version(&self, desktop: &Desktop, window: WindowId) -> Option<String> {
        self.extractor.extract(desktop, window)
    }

    /// One manual check, end to end.
    ///
    /// When several candidates match, the last one in enumeration order is
    /// checked - the most recently surfaced popup wins. The handled set is
    /// not consulted: a manual check always reports.
    pub fn check_once(&self, desktop: &Desktop, request: &CheckRequest) -> CheckResult {
        if request.input_version.is_empty() {
            return CheckResult::new(
                &request.input_version,
                None,
                Verdict::Error,
                "Input version is empty.",
            );
        }

        let windows = self.locate(desktop, request);
        let window = match windows.last() {
            Some(window) => *window,
            None => {
                return if request.has_title_key() {
                    CheckResult::new(
                        &request.input_version,
                        None,
                        Verdict::NotFound,
                        format!(
                            "Target not found (title contains='{}').",
                            request.title_key
                        ),
                    )
                } else if request.has_content_key() {
                    CheckResult::new(
                        &request.input_version,
                        None,
                        Verdict::NotFound,
                        format!(
                            "Target not found (content contains='{}').",
                            request.content_key
                        ),
                    )
                } else {
                    CheckResult::new(
                        &request.input_version,
                        None,
                        Verdict::Error,
                        "No search key configured (set a title key or a content key).",
                    )
                };
            }
        };

        if request.needs_confirmation() && !self.confirm(desktop, request, window) {
            return CheckResult::new(
                &request.input_version,
                None,
                Verdict::Skip,
                format!(
                    "Title matched but popup missing content '{}' (skip).",
                    request.content_key
                ),
            );
        }

        match self.read_version(desktop, window) {
            Some(version) => CheckResult::compare(&request.input_version, &version),
            None => CheckResult::new(
                &request.input_version,
                None,
                Verdict::NotFound,
                "Popup found but cannot read firmware version (no backend text available).",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwcheck_probe::testing::{MockBackend, MockWindow};
    use std::sync::Arc;

    fn desktop(rich: MockBackend, legacy: MockBackend) -> Desktop {
        Desktop::new(Arc::new(rich), Arc::new(legacy))
    }

    fn checker() -> Checker {
        Checker::from_config(&CheckerConfig::default()).unwrap()
    }

    #[test]
    fn test_request_trims_fields() {
        let request = CheckRequest::new(" 1.0 ", " title ", "  ");
        assert_eq!(request.input_version, "1.0");
        assert_eq!(request.title_key, "title");
        assert!(!request.has_content_key());
        assert!(!request.needs_confirmation());
    }

    #[test]
    fn test_blank_input_is_error() {
        let desktop = desktop(MockBackend::new("rich"), MockBackend::new("legacy"));
        let request = CheckRequest::new("", "popup", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::Error);
        assert_eq!(result.message, "Input version is empty.");
    }

    #[test]
    fn test_no_keys_is_error() {
        let desktop = desktop(MockBackend::new("rich"), MockBackend::new("legacy"));
        let request = CheckRequest::new("1.0", "", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::Error);
        assert!(result.message.contains("search key"));
    }

    #[test]
    fn test_title_not_found_message_names_the_key() {
        let desktop = desktop(MockBackend::new("rich"), MockBackend::new("legacy"));
        let request = CheckRequest::new("1.0", "NoSuchPopup", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::NotFound);
        assert!(result.message.contains("title contains='NoSuchPopup'"));
    }

    #[test]
    fn test_content_not_found_message_names_the_key() {
        let desktop = desktop(MockBackend::new("rich"), MockBackend::new("legacy"));
        let request = CheckRequest::new("1.0", "", "Firmware Version");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::NotFound);
        assert!(result.message.contains("content contains='Firmware Version'"));
    }

    #[test]
    fn test_last_matching_window_wins() {
        let legacy = MockBackend::new("legacy")
            .with_window(
                MockWindow::new(1)
                    .with_title("popup")
                    .with_texts(["Firmware Version : 1.1.1"]),
            )
            .with_window(
                MockWindow::new(2)
                    .with_title("popup")
                    .with_texts(["Firmware Version : 2.2.2"]),
            );
        let desktop = desktop(MockBackend::new("rich"), legacy);
        let request = CheckRequest::new("2.2.2", "popup", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::Ok);
        assert_eq!(result.popup_version.as_deref(), Some("2.2.2"));
    }

    #[test]
    fn test_confirmation_gate_skips_false_positive() {
        let legacy = MockBackend::new("legacy").with_window(
            MockWindow::new(1)
                .with_title("popup")
                .with_texts(["some unrelated dialog"]),
        );
        let rich = MockBackend::new("rich")
            .with_window(MockWindow::new(1).with_texts(["still unrelated"]));
        let desktop = desktop(rich, legacy);
        let request = CheckRequest::new("1.0", "popup", "Firmware Version");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::Skip);
        assert!(result.message.contains("Firmware Version"));
    }

    #[test]
    fn test_no_confirmation_without_content_key() {
        let legacy = MockBackend::new("legacy").with_window(
            MockWindow::new(1)
                .with_title("popup")
                .with_texts(["Firmware Version : 9.9"]),
        );
        let desktop = desktop(MockBackend::new("rich"), legacy);
        let request = CheckRequest::new("9.9", "popup", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_unreadable_version_is_not_found() {
        let legacy = MockBackend::new("legacy")
            .with_window(MockWindow::new(1).with_title("popup").with_texts(["no token"]));
        let desktop = desktop(MockBackend::new("rich"), legacy);
        let request = CheckRequest::new("1.0", "popup", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::NotFound);
        assert!(result.message.contains("cannot read firmware version"));
    }

    #[test]
    fn test_mismatch_is_ng() {
        let legacy = MockBackend::new("legacy").with_window(
            MockWindow::new(1)
                .with_title("popup")
                .with_texts(["Firmware Version : 24071722"]),
        );
        let desktop = desktop(MockBackend::new("rich"), legacy);
        let request = CheckRequest::new("24071721", "popup", "");

        let result = checker().check_once(&desktop, &request);
        assert_eq!(result.verdict, Verdict::Ng);
        assert!(result.message.contains("24071721"));
        assert!(result.message.contains("24071722"));
    }
}
