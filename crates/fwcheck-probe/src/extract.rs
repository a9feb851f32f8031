//! Version extraction through an ordered source chain.

use tracing::{debug, trace};

use fwcheck_core::{VersionPattern, WindowId};

use crate::backend::Desktop;

/// Text source tried when reading the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextSource {
    /// Rich backend aggregation
    Rich,
    /// Legacy backend aggregation
    Legacy,
    /// Window title alone
    TitleOnly,
}

/// Fixed priority order of the extraction chain.
const SOURCE_ORDER: [TextSource; 3] = [TextSource::Rich, TextSource::Legacy, TextSource::TitleOnly];

/// Reads the firmware version out of a window.
///
/// Sources are tried in strict order - rich aggregation, legacy aggregation,
/// then the bare title - and the first non-empty match wins. Partial results
/// from different sources are never merged. A failing source is skipped;
/// only exhaustion of the whole chain counts as "no version found".
#[derive(Debug, Clone, Default)]
pub struct VersionExtractor {
    pattern: VersionPattern,
}

impl VersionExtractor {
    /// Create an extractor with the given pattern.
    pub fn new(pattern: VersionPattern) -> Self {
        Self { pattern }
    }

    /// Extract the version token from `window`, if any source yields one.
    pub fn extract(&self, desktop: &Desktop, window: WindowId) -> Option<String> {
        for source in SOURCE_ORDER {
            let haystack = match source {
                TextSource::Rich => desktop.rich().texts(window).map(|b| b.joined()),
                TextSource::Legacy => desktop.legacy().texts(window).map(|b| b.joined()),
                TextSource::TitleOnly => desktop.legacy().title(window),
            };

            let haystack = match haystack {
                Ok(text) => text,
                Err(e) => {
                    trace!("source {source:?} unavailable for {window}: {e}");
                    continue;
                }
            };

            if let Some(token) = self.pattern.extract(&haystack) {
                debug!("version {token:?} extracted from {window} via {source:?}");
                return Some(token);
            }
        }
        None
    }
}
