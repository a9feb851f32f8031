//! Configuration types for fwcheck.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pattern::DEFAULT_VERSION_PATTERN;
use crate::VersionPattern;

/// Checker configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CheckerConfig {
    /// Target window discovery settings
    pub target: TargetSettings,
    /// Auto-polling settings
    pub polling: PollingSettings,
    /// Device-watcher settings
    pub watcher: WatcherSettings,
    /// History persistence settings
    pub history: HistorySettings,
    /// Audio feedback settings
    pub audio: AudioSettings,
}

impl CheckerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: CheckerConfig =
            serde_yaml::from_str(yaml).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling.interval_ms == 0 {
            return Err(crate::Error::Config(
                "polling.interval_ms must be > 0".to_string(),
            ));
        }

        if self.polling.handled_capacity == 0 {
            return Err(crate::Error::Config(
                "polling.handled_capacity must be > 0".to_string(),
            ));
        }

        if self.target.max_content_scan == 0 {
            return Err(crate::Error::Config(
                "target.max_content_scan must be > 0".to_string(),
            ));
        }

        if self.watcher.poll_ms == 0 {
            return Err(crate::Error::Config(
                "watcher.poll_ms must be > 0".to_string(),
            ));
        }

        // The pattern must compile and expose a token capture group
        VersionPattern::new(&self.target.version_pattern)
            .map_err(|e| crate::Error::Config(e.to_string()))?;

        Ok(())
    }
}

/// Target window discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Title substring of the target popup (empty = title mode disabled)
    pub title_contains: String,
    /// Content substring of the target popup, also the confirmation key
    pub content_contains: String,
    /// Pattern extracting the version token from aggregated text
    pub version_pattern: String,
    /// Cap on windows examined per content-mode scan
    pub max_content_scan: usize,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            title_contains: "AitUVCExtTest".to_string(),
            content_contains: "Firmware Version".to_string(),
            version_pattern: DEFAULT_VERSION_PATTERN.to_string(),
            max_content_scan: 80,
        }
    }
}

/// Auto-polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Delay between the end of one tick and the start of the next
    pub interval_ms: u64,
    /// Handled-set size that triggers a full clear
    pub handled_capacity: usize,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            handled_capacity: 5000,
        }
    }
}

/// Device-watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    /// Title substring locating the vendor tool's main window
    pub app_title_contains: String,
    /// Watcher poll interval
    pub poll_ms: u64,
    /// Minimum device-info text length counted as "device connected"
    pub min_info_len: usize,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            app_title_contains: "AIT UVC Extension Unit Tool".to_string(),
            poll_ms: 300,
            min_info_len: 3,
        }
    }
}

/// History persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// SQLite database path
    pub path: PathBuf,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fwcheck-history.db"),
        }
    }
}

/// Audio feedback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Whether to play sounds at all
    pub enabled: bool,
    /// Sound played on OK
    pub ok_sound: PathBuf,
    /// Sound played on NG and ERROR
    pub wrong_sound: PathBuf,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ok_sound: PathBuf::from("assets/Ok.mp3"),
            wrong_sound: PathBuf::from("assets/Wrong.mp3"),
        }
    }
}
