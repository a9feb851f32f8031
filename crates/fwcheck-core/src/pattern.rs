//! Firmware-version pattern matching.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Result};

/// Default pattern: `Firmware Version : <token>` with a case-insensitive
/// label, flexible whitespace around the colon, and a case-preserved token.
pub const DEFAULT_VERSION_PATTERN: &str = r"(?i)Firmware\s*Version\s*:\s*([0-9A-Za-z._\-]+)";

lazy_static! {
    static ref DEFAULT_REGEX: Regex =
        Regex::new(DEFAULT_VERSION_PATTERN).expect("default version pattern must compile");
}

/// Extracts a firmware-version token from free text.
///
/// The pattern must contain at least one capture group; the first group of
/// the first match is the token.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
}

impl VersionPattern {
    /// Compile a custom pattern.
    ///
    /// Fails if the pattern does not compile or has no capture group.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern(e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(Error::InvalidPattern(format!(
                "pattern '{pattern}' has no capture group for the version token"
            )));
        }
        Ok(Self { regex })
    }

    /// Extract the version token from `text`, if present.
    ///
    /// Returns the first match's first capture, trimmed. Case of the token
    /// is preserved.
    pub fn extract(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

impl Default for VersionPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain() {
        let pattern = VersionPattern::default();
        assert_eq!(
            pattern.extract("Firmware Version: 24071721"),
            Some("24071721".to_string())
        );
    }

    #[test]
    fn test_extract_case_insensitive_label_flexible_whitespace() {
        let pattern = VersionPattern::default();
        assert_eq!(
            pattern.extract("firmware   version :AB-12.3"),
            Some("AB-12.3".to_string())
        );
    }

    #[test]
    fn test_extract_preserves_token_case() {
        let pattern = VersionPattern::default();
        assert_eq!(
            pattern.extract("FIRMWARE VERSION : aBc_1.2-X"),
            Some("aBc_1.2-X".to_string())
        );
    }

    #[test]
    fn test_extract_no_match() {
        let pattern = VersionPattern::default();
        assert_eq!(pattern.extract("no match here"), None);
    }

    #[test]
    fn test_extract_first_match_wins() {
        let pattern = VersionPattern::default();
        let text = "Firmware Version : 1.0.0\nFirmware Version : 2.0.0";
        assert_eq!(pattern.extract(text), Some("1.0.0".to_string()));
    }

    #[test]
    fn test_extract_embedded_in_surrounding_text() {
        let pattern = VersionPattern::default();
        let text = "Device OK\nFirmware Version : 24071721\nSerial: 991";
        assert_eq!(pattern.extract(text), Some("24071721".to_string()));
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = VersionPattern::new(r"FW=(\d+)").unwrap();
        assert_eq!(pattern.extract("FW=123"), Some("123".to_string()));
        assert_eq!(pattern.extract("Firmware Version: 1"), None);
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let result = VersionPattern::new("([unclosed");
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_pattern_without_capture_group_rejected() {
        let result = VersionPattern::new(r"Firmware Version: \d+");
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }
}
