//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the outbound ports. The HTTP gateway lives
//! in `qv-api-client`.

mod clock;
mod memory;

pub use clock::{FixedClock, SystemClock};
pub use memory::{poll_fixture, CallCounts, GatewayOp, InMemoryPollApi};
