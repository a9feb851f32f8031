//! Window identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a top-level window.
///
/// Wraps the platform window handle value (HWND on Windows). A `WindowId` is
/// a transient reference: it is only meaningful while the underlying window
/// exists, and it is the identity key for polling deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub isize);

impl WindowId {
    /// Raw handle value.
    pub fn raw(&self) -> isize {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl From<isize> for WindowId {
    fn from(handle: isize) -> Self {
        Self(handle)
    }
}
