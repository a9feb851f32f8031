//! # fwcheck-core
//!
//! Core types for the fwcheck firmware popup checker.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other fwcheck crates. It provides:
//!
//! - Window identity (WindowId)
//! - Text bundles (deduplicated window text collections)
//! - The firmware-version pattern
//! - Check results and verdicts
//! - Configuration types
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other fwcheck crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all modules
pub mod bundle;
pub mod config;
pub mod error;
pub mod pattern;
pub mod report;
pub mod window;

// Re-export commonly used types
pub use bundle::TextBundle;
pub use config::{
    AudioSettings, CheckerConfig, HistorySettings, PollingSettings, TargetSettings,
    WatcherSettings,
};
pub use error::{Error, Result};
pub use pattern::VersionPattern;
pub use report::{CheckResult, Verdict};
pub use window::WindowId;
