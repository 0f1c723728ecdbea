//! Domain layer for the voting session
//!
//! Synchronous decision logic; no I/O.

pub mod gate;
pub mod hydration;

pub use gate::{
    build_weight_distribution, decide_action, has_changed, GateBlocker, GateInput, SubmitGate,
};
pub use hydration::{HydrationStatus, HydrationTicket, Hydrator, ReseedPolicy, SeedOutcome};
