//! Pointer listener adapter that only keeps count.
//!
//! Used by headless hosts (CLI, tests) to verify that every drag attaches
//! and releases its listeners exactly once.

use crate::ports::outbound::{ListenerHandle, PointerListeners};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
struct Counters {
    active: AtomicUsize,
    attached_total: AtomicUsize,
}

/// In-process listener registry.
#[derive(Clone, Default)]
pub struct TrackingPointerListeners {
    counters: Arc<Counters>,
}

impl TrackingPointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations currently attached.
    pub fn active(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }

    /// Registrations ever attached.
    pub fn attached_total(&self) -> usize {
        self.counters.attached_total.load(Ordering::SeqCst)
    }
}

impl PointerListeners for TrackingPointerListeners {
    fn attach(&self) -> ListenerHandle {
        self.counters.active.fetch_add(1, Ordering::SeqCst);
        self.counters.attached_total.fetch_add(1, Ordering::SeqCst);
        debug!(active = self.active(), "global pointer listeners attached");

        let counters = Arc::clone(&self.counters);
        ListenerHandle::new(move || {
            counters.active.fetch_sub(1, Ordering::SeqCst);
            debug!("global pointer listeners released");
        })
    }
}
