//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The host view's global pointer listeners. A drag that starts inside a row
//! keeps tracking outside the row and ends on release anywhere on screen, so
//! the adapter subscribes to viewport-wide move/up events for the duration
//! of a drag.

use std::fmt;

/// Host facility that delivers viewport-wide pointer move/up events.
pub trait PointerListeners: Send + Sync {
    /// Start delivering global pointer events.
    ///
    /// Delivery stops when the returned handle is dropped.
    fn attach(&self) -> ListenerHandle;
}

/// Scoped registration of global pointer listeners.
///
/// Dropping the handle releases the registration, so every exit path
/// (pointer-up, cancel, view teardown) detaches exactly once.
#[must_use = "dropping the handle detaches the listeners immediately"]
pub struct ListenerHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Handle for hosts without global listeners.
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("attached", &self.release.is_some())
            .finish()
    }
}
