//! Platform wiring for the native accessibility backends.
//!
//! The rich and legacy backends are only implemented on Windows; other
//! platforms get a clean `BackendUnavailable` error so the rest of the tool
//! (config handling, history queries, tests against the mock backend) still
//! works everywhere.

use fwcheck_core::Result;

use crate::backend::Desktop;
use crate::panel::DevicePanel;

// Platform-specific implementations
#[cfg(target_os = "windows")]
pub mod uia;

#[cfg(target_os = "windows")]
pub mod win32;

/// Build the native backend pair for this platform.
#[cfg(target_os = "windows")]
pub fn native_desktop() -> Result<Desktop> {
    use std::sync::Arc;

    Ok(Desktop::new(
        Arc::new(uia::UiaBackend::new()?),
        Arc::new(win32::Win32Backend::new()),
    ))
}

/// Build the native backend pair for this platform.
#[cfg(not(target_os = "windows"))]
pub fn native_desktop() -> Result<Desktop> {
    Err(fwcheck_core::Error::BackendUnavailable(
        "native accessibility backends require Windows".to_string(),
    ))
}

/// Build the native device panel for the vendor tool.
///
/// `app_title_contains` locates the tool's main window by title substring.
#[cfg(target_os = "windows")]
pub fn native_device_panel(app_title_contains: &str) -> Result<Box<dyn DevicePanel>> {
    Ok(Box::new(uia::UiaDevicePanel::new(app_title_contains)?))
}

/// Build the native device panel for the vendor tool.
#[cfg(not(target_os = "windows"))]
pub fn native_device_panel(_app_title_contains: &str) -> Result<Box<dyn DevicePanel>> {
    Err(fwcheck_core::Error::BackendUnavailable(
        "the device watcher requires Windows".to_string(),
    ))
}
