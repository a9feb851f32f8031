//! Legacy backend over the Win32 window tree.

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindow, GetWindowTextW, IsWindow, IsWindowVisible, SendMessageW, GW_CHILD,
    GW_HWNDNEXT, WM_GETTEXT, WM_GETTEXTLENGTH,
};

use fwcheck_core::{Error, Result, TextBundle, WindowId};

use crate::backend::AccessBackend;

/// Legacy accessibility backend: plain Win32 window handles.
///
/// Collection per window is shallow by contract: the window's own text, the
/// WM_GETTEXT reply, and each direct child's text. Nothing recurses into
/// grandchildren; that is the rich backend's job.
#[derive(Debug, Default)]
pub struct Win32Backend;

impl Win32Backend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }

    fn hwnd(window: WindowId) -> HWND {
        HWND(window.raw() as *mut core::ffi::c_void)
    }

    /// GetWindowTextW into a fixed buffer. Empty on failure.
    fn window_caption(hwnd: HWND) -> String {
        let mut buf = [0u16; 512];
        let len = unsafe { GetWindowTextW(hwnd, &mut buf) } as usize;
        String::from_utf16_lossy(&buf[..len.min(buf.len())])
    }

    /// WM_GETTEXT, which crosses into controls GetWindowTextW cannot read.
    fn message_text(hwnd: HWND) -> Option<String> {
        let len =
            unsafe { SendMessageW(hwnd, WM_GETTEXTLENGTH, WPARAM(0), LPARAM(0)) }.0 as usize;
        if len == 0 || len > 1 << 20 {
            return None;
        }

        let mut buf = vec![0u16; len + 1];
        let copied = unsafe {
            SendMessageW(
                hwnd,
                WM_GETTEXT,
                WPARAM(buf.len()),
                LPARAM(buf.as_mut_ptr() as isize),
            )
        }
        .0 as usize;

        if copied == 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buf[..copied.min(len)]))
    }

    /// Direct children only, in sibling order.
    fn direct_children(hwnd: HWND) -> Vec<HWND> {
        let mut children = Vec::new();
        let mut child = unsafe { GetWindow(hwnd, GW_CHILD) }.ok();
        while let Some(current) = child {
            children.push(current);
            child = unsafe { GetWindow(current, GW_HWNDNEXT) }.ok();
        }
        children
    }
}

unsafe extern "system" fn enum_visible_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let out = &mut *(lparam.0 as *mut Vec<WindowId>);
    if IsWindowVisible(hwnd).as_bool() {
        out.push(WindowId(hwnd.0 as isize));
    }
    true.into()
}

impl AccessBackend for Win32Backend {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn windows(&self) -> Result<Vec<WindowId>> {
        let mut out: Vec<WindowId> = Vec::new();
        unsafe {
            EnumWindows(
                Some(enum_visible_proc),
                LPARAM(&mut out as *mut Vec<WindowId> as isize),
            )
        }
        .map_err(|e| Error::BackendUnavailable(format!("EnumWindows failed: {e}")))?;
        Ok(out)
    }

    fn title(&self, window: WindowId) -> Result<String> {
        let hwnd = Self::hwnd(window);
        if !unsafe { IsWindow(hwnd) }.as_bool() {
            return Err(Error::WindowGone(window));
        }
        Ok(Self::window_caption(hwnd))
    }

    fn texts(&self, window: WindowId) -> Result<TextBundle> {
        let hwnd = Self::hwnd(window);
        if !unsafe { IsWindow(hwnd) }.as_bool() {
            return Err(Error::WindowGone(window));
        }

        let mut bundle = TextBundle::new();
        bundle.push(Self::window_caption(hwnd));
        if let Some(text) = Self::message_text(hwnd) {
            bundle.push(text);
        }
        for child in Self::direct_children(hwnd) {
            if let Some(text) = Self::message_text(child) {
                bundle.push(text);
            }
        }
        Ok(bundle)
    }
}
