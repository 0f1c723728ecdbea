//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for hosts without a real viewport.

mod listeners;

pub use listeners::TrackingPointerListeners;
