//! Rich backend over UI Automation.

use std::sync::Arc;

use tracing::trace;
use uiautomation::controls::ControlType;
use uiautomation::patterns::UIInvokePattern;
use uiautomation::types::{Handle, TreeScope, UIProperty};
use uiautomation::variants::Variant;
use uiautomation::{UIAutomation, UIElement, UITreeWalker};

use fwcheck_core::{Error, Result, TextBundle, WindowId};

use crate::backend::AccessBackend;
use crate::panel::DevicePanel;

/// Depth guard for descendant walks. A firmware dialog is a handful of
/// levels deep; anything past this is a runaway foreign tree.
const MAX_WALK_DEPTH: usize = 32;

/// `UIAutomation` holds COM interface pointers; the checker confines all
/// calls to one logical inspection thread, the wrapper just lets the
/// backend live inside `Arc<dyn AccessBackend>`.
struct SharedAutomation(Arc<UIAutomation>);

unsafe impl Send for SharedAutomation {}
unsafe impl Sync for SharedAutomation {}

/// Rich accessibility backend: the hierarchical UI Automation tree.
///
/// Collects the window's own name, then every descendant's name, value
/// pattern value, and legacy accessible name/value. Each property read is
/// individually absorbed on failure.
pub struct UiaBackend {
    automation: SharedAutomation,
}

impl UiaBackend {
    /// Connect to UI Automation.
    pub fn new() -> Result<Self> {
        let automation = UIAutomation::new()
            .map_err(|e| Error::BackendUnavailable(format!("UI Automation init failed: {e}")))?;
        Ok(Self {
            automation: SharedAutomation(Arc::new(automation)),
        })
    }

    fn automation(&self) -> &UIAutomation {
        &self.automation.0
    }

    fn element(&self, window: WindowId) -> Result<UIElement> {
        self.automation()
            .element_from_handle(Handle::from(window.raw()))
            .map_err(|_| Error::WindowGone(window))
    }

    /// Push every readable text property of one element.
    fn harvest(element: &UIElement, bundle: &mut TextBundle) {
        if let Ok(name) = element.get_name() {
            bundle.push(name);
        }
        for property in [
            UIProperty::ValueValue,
            UIProperty::LegacyIAccessibleName,
            UIProperty::LegacyIAccessibleValue,
        ] {
            if let Ok(value) = element.get_property_value(property) {
                if let Ok(text) = value.get_string() {
                    bundle.push(text);
                }
            }
        }
    }

    /// Depth-first walk over all descendants, absorbing per-element errors.
    fn walk(walker: &UITreeWalker, element: &UIElement, bundle: &mut TextBundle, depth: usize) {
        if depth > MAX_WALK_DEPTH {
            return;
        }

        let mut child = walker.get_first_child(element).ok();
        while let Some(current) = child {
            Self::harvest(&current, bundle);
            Self::walk(walker, &current, bundle, depth + 1);
            child = walker.get_next_sibling(&current).ok();
        }
    }
}

impl AccessBackend for UiaBackend {
    fn name(&self) -> &'static str {
        "uia"
    }

    fn windows(&self) -> Result<Vec<WindowId>> {
        let root = self
            .automation()
            .get_root_element()
            .map_err(|e| Error::BackendUnavailable(format!("no UIA root: {e}")))?;

        let condition = self
            .automation()
            .create_property_condition(
                UIProperty::ControlType,
                Variant::from(ControlType::Window as i32),
                None,
            )
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        let elements = root
            .find_all(TreeScope::Children, &condition)
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        let mut out = Vec::new();
        for element in elements {
            if element.is_offscreen().unwrap_or(true) {
                continue;
            }
            if let Ok(handle) = element.get_native_window_handle() {
                let hwnd: windows::Win32::Foundation::HWND = handle.into();
                out.push(WindowId(hwnd.0 as isize));
            }
        }
        Ok(out)
    }

    fn title(&self, window: WindowId) -> Result<String> {
        let element = self.element(window)?;
        element.get_name().map_err(|_| Error::WindowGone(window))
    }

    fn texts(&self, window: WindowId) -> Result<TextBundle> {
        let element = self.element(window)?;

        let mut bundle = TextBundle::new();
        Self::harvest(&element, &mut bundle);

        match self.automation().get_control_view_walker() {
            Ok(walker) => Self::walk(&walker, &element, &mut bundle, 0),
            Err(e) => trace!("control view walker unavailable: {e}"),
        }

        Ok(bundle)
    }
}

/// UI Automation view of the vendor tool's device panel.
///
/// Locates the tool's main window by title substring, reads the widest
/// Edit control as the device-info field (falling back to Text controls),
/// and drives the "FW Version" button.
pub struct UiaDevicePanel {
    automation: SharedAutomation,
    app_title_contains: String,
}

impl UiaDevicePanel {
    /// Connect and remember the window-title key.
    pub fn new(app_title_contains: &str) -> Result<Self> {
        let automation = UIAutomation::new()
            .map_err(|e| Error::BackendUnavailable(format!("UI Automation init failed: {e}")))?;
        Ok(Self {
            automation: SharedAutomation(Arc::new(automation)),
            app_title_contains: app_title_contains.to_string(),
        })
    }

    fn app_window(&self) -> Result<UIElement> {
        self.automation
            .0
            .create_matcher()
            .control_type(ControlType::Window)
            .contains_name(&self.app_title_contains)
            .depth(2)
            .timeout(3000)
            .find_first()
            .map_err(|e| Error::Other(format!("vendor tool window not found: {e}")))
    }

    /// The widest Edit descendant, or the widest Text when no Edit exists.
    fn device_info_control(&self, app: &UIElement) -> Option<UIElement> {
        for control_type in [ControlType::Edit, ControlType::Text] {
            let found = self
                .automation
                .0
                .create_matcher()
                .from_ref(app)
                .control_type(control_type)
                .timeout(1000)
                .find_all();

            let candidates = match found {
                Ok(candidates) if !candidates.is_empty() => candidates,
                _ => continue,
            };

            let mut best: Option<(i32, UIElement)> = None;
            for candidate in candidates {
                let width = match candidate.get_bounding_rectangle() {
                    Ok(rect) => rect.get_width(),
                    Err(_) => continue,
                };
                if best.as_ref().map_or(true, |(w, _)| width > *w) {
                    best = Some((width, candidate));
                }
            }
            if let Some((_, element)) = best {
                return Some(element);
            }
        }
        None
    }
}

impl DevicePanel for UiaDevicePanel {
    fn device_info(&self) -> Result<String> {
        let app = self.app_window()?;
        let control = match self.device_info_control(&app) {
            Some(control) => control,
            None => return Ok(String::new()),
        };

        // Edit controls report their text through the value pattern; the
        // name is only a fallback.
        let value = control
            .get_property_value(UIProperty::ValueValue)
            .and_then(|v| v.get_string())
            .unwrap_or_default();
        if !value.trim().is_empty() {
            return Ok(value.trim().to_string());
        }
        Ok(control.get_name().unwrap_or_default().trim().to_string())
    }

    fn request_version_popup(&self) -> Result<()> {
        let app = self.app_window()?;
        app.set_focus()
            .map_err(|e| Error::Other(format!("cannot focus vendor tool: {e}")))?;

        let button = self
            .automation
            .0
            .create_matcher()
            .from_ref(&app)
            .control_type(ControlType::Button)
            .contains_name("FW Version")
            .timeout(2000)
            .find_first()
            .map_err(|e| Error::Other(format!("FW Version button not found: {e}")))?;

        button
            .get_pattern::<UIInvokePattern>()
            .and_then(|pattern| pattern.invoke())
            .map_err(|e| Error::Other(format!("FW Version invoke failed: {e}")))
    }
}
