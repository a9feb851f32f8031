//! Device watcher: rising-edge popup trigger.

use std::time::Duration;

use tracing::{info, warn};

use fwcheck_core::Result;
use fwcheck_probe::DevicePanel;

use crate::poller::PollControl;

/// Watches the vendor tool's device-info field and requests the firmware
/// popup exactly once per connection event.
///
/// "Connected" means the trimmed info text is at least `min_info_len`
/// characters long; the popup request fires only on the rising edge of
/// that state.
pub struct DeviceWatcher<P: DevicePanel> {
    panel: P,
    min_info_len: usize,
    last_connected: bool,
}

impl<P: DevicePanel> DeviceWatcher<P> {
    /// Create a watcher in the "disconnected" state.
    pub fn new(panel: P, min_info_len: usize) -> Self {
        Self {
            panel,
            min_info_len,
            last_connected: false,
        }
    }

    /// One observation. Returns `Ok(true)` on the rising edge.
    ///
    /// A failed popup request leaves the connection state untouched, so the
    /// next observation retries the request.
    pub fn observe(&mut self) -> Result<bool> {
        let info = self.panel.device_info()?;
        let connected = info.trim().len() >= self.min_info_len;
        let rising_edge = connected && !self.last_connected;

        if rising_edge {
            self.panel.request_version_popup()?;
        }

        self.last_connected = connected;
        Ok(rising_edge)
    }

    /// Watch until the control handle stops.
    ///
    /// A failing observation is logged and the loop carries on; a flaky
    /// vendor tool must not kill the watcher.
    pub async fn run(&mut self, interval: Duration, control: PollControl) {
        info!("device watcher started (interval {:?})", interval);

        while control.is_running() {
            match self.observe() {
                Ok(true) => info!("device connected, firmware popup requested"),
                Ok(false) => {}
                Err(e) => warn!("device watcher: {e}"),
            }
            tokio::time::sleep(interval).await;
        }

        info!("device watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwcheck_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Panel replaying a scripted sequence of info reads.
    struct ScriptedPanel {
        infos: Mutex<Vec<Result<String>>>,
        popup_requests: AtomicUsize,
        fail_popup: bool,
    }

    impl ScriptedPanel {
        fn new(infos: Vec<Result<String>>) -> Self {
            Self {
                infos: Mutex::new(infos),
                popup_requests: AtomicUsize::new(0),
                fail_popup: false,
            }
        }

        fn failing_popup(mut self) -> Self {
            self.fail_popup = true;
            self
        }

        fn requests(&self) -> usize {
            self.popup_requests.load(Ordering::SeqCst)
        }
    }

    impl DevicePanel for &ScriptedPanel {
        fn device_info(&self) -> Result<String> {
            let mut infos = self.infos.lock().unwrap();
            if infos.is_empty() {
                return Ok(String::new());
            }
            infos.remove(0)
        }

        fn request_version_popup(&self) -> Result<()> {
            self.popup_requests.fetch_add(1, Ordering::SeqCst);
            if self.fail_popup {
                Err(Error::Other("button gone".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_rising_edge_fires_once() {
        let panel = ScriptedPanel::new(vec![
            Ok(String::new()),
            Ok("SN-991".to_string()),
            Ok("SN-991".to_string()),
        ]);
        let mut watcher = DeviceWatcher::new(&panel, 3);

        assert!(!watcher.observe().unwrap());
        assert!(watcher.observe().unwrap());
        assert!(!watcher.observe().unwrap());
        assert_eq!(panel.requests(), 1);
    }

    #[test]
    fn test_reconnect_fires_again() {
        let panel = ScriptedPanel::new(vec![
            Ok("SN-991".to_string()),
            Ok(String::new()),
            Ok("SN-992".to_string()),
        ]);
        let mut watcher = DeviceWatcher::new(&panel, 3);

        assert!(watcher.observe().unwrap());
        assert!(!watcher.observe().unwrap());
        assert!(watcher.observe().unwrap());
        assert_eq!(panel.requests(), 2);
    }

    #[test]
    fn test_min_len_threshold_is_exclusive_below() {
        let panel = ScriptedPanel::new(vec![
            Ok("ab".to_string()),
            Ok("abc".to_string()),
        ]);
        let mut watcher = DeviceWatcher::new(&panel, 3);

        // Two characters is below the threshold: still disconnected
        assert!(!watcher.observe().unwrap());
        assert!(watcher.observe().unwrap());
    }

    #[test]
    fn test_whitespace_does_not_count() {
        let panel = ScriptedPanel::new(vec![Ok("   \t  ".to_string())]);
        let mut watcher = DeviceWatcher::new(&panel, 3);
        assert!(!watcher.observe().unwrap());
    }

    #[test]
    fn test_failed_popup_request_retries_next_observation() {
        let panel = ScriptedPanel::new(vec![
            Ok("SN-991".to_string()),
            Ok("SN-991".to_string()),
        ])
        .failing_popup();
        let mut watcher = DeviceWatcher::new(&panel, 3);

        // The request fails; the connected state is not latched
        assert!(watcher.observe().is_err());
        // Still treated as a rising edge, so the request is retried
        assert!(watcher.observe().is_err());
        assert_eq!(panel.requests(), 2);
    }

    #[test]
    fn test_info_read_failure_propagates() {
        let panel = ScriptedPanel::new(vec![Err(Error::Other("window gone".to_string()))]);
        let mut watcher = DeviceWatcher::new(&panel, 3);
        assert!(watcher.observe().is_err());
        assert_eq!(panel.requests(), 0);
    }
}
