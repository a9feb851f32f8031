//! Check results and verdicts.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used on results and history rows.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Outcome of one detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Extracted version matched the expected input
    #[serde(rename = "OK")]
    Ok,
    /// Extracted version differed from the expected input
    #[serde(rename = "NG")]
    Ng,
    /// No target window, or no version readable from the target
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// Invalid operator input (blank expected version, no search keys)
    #[serde(rename = "ERROR")]
    Error,
    /// Title matched but the confirmation content was missing
    #[serde(rename = "SKIP")]
    Skip,
}

impl Verdict {
    /// Stable string form, as recorded in history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Ng => "NG",
            Verdict::NotFound => "NOT_FOUND",
            Verdict::Error => "ERROR",
            Verdict::Skip => "SKIP",
        }
    }

    /// Parse the stable string form.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "OK" => Some(Verdict::Ok),
            "NG" => Some(Verdict::Ng),
            "NOT_FOUND" => Some(Verdict::NotFound),
            "ERROR" => Some(Verdict::Error),
            "SKIP" => Some(Verdict::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable detection outcome.
///
/// Produced by the check pipeline, consumed by sinks (history, audio,
/// console). One instance per detection event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Operator-entered expected version
    pub input_version: String,

    /// Version extracted from the popup, when one was readable
    pub popup_version: Option<String>,

    /// Outcome classification
    pub verdict: Verdict,

    /// Human-readable explanation
    pub message: String,

    /// Local timestamp of the event
    pub timestamp: String,
}

impl CheckResult {
    /// Build a result stamped with the current local time.
    pub fn new(
        input_version: impl Into<String>,
        popup_version: Option<String>,
        verdict: Verdict,
        message: impl Into<String>,
    ) -> Self {
        Self {
            input_version: input_version.into(),
            popup_version,
            verdict,
            message: message.into(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Compare an extracted version against the expected input.
    ///
    /// The comparison ignores ASCII case; the message for a mismatch carries
    /// both values.
    pub fn compare(input_version: &str, popup_version: &str) -> Self {
        if popup_version.eq_ignore_ascii_case(input_version) {
            Self::new(
                input_version,
                Some(popup_version.to_string()),
                Verdict::Ok,
                "Version matched.",
            )
        } else {
            Self::new(
                input_version,
                Some(popup_version.to_string()),
                Verdict::Ng,
                format!("Version mismatch. Popup={popup_version}, Input={input_version}"),
            )
        }
    }
}
