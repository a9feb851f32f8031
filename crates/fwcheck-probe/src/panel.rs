//! Device-panel capability for the vendor tool's main window.

use fwcheck_core::Result;

/// Access to the vendor tool's device panel.
///
/// The watcher uses this to read the device-info field (whose text length
/// signals whether a device is plugged in) and to request the firmware
/// popup once per connection event.
pub trait DevicePanel: Send + Sync {
    /// Current text of the device-info field, trimmed.
    ///
    /// An empty string means no device information is displayed.
    fn device_info(&self) -> Result<String>;

    /// Bring the tool to the foreground and invoke its firmware-version
    /// button, making the popup appear.
    fn request_version_popup(&self) -> Result<()>;
}

impl<P: DevicePanel + ?Sized> DevicePanel for Box<P> {
    fn device_info(&self) -> Result<String> {
        (**self).device_info()
    }

    fn request_version_popup(&self) -> Result<()> {
        (**self).request_version_popup()
    }
}
