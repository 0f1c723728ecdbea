//! Ports module for the allocation engine

pub mod outbound;

pub use outbound::{ListenerHandle, PointerListeners};
