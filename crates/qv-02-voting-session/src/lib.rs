//! # Voting Session (qv-02)
//!
//! Drives one poll view from "poll id known" to "vote stored".
//!
//! ## Flow
//!
//! ```text
//! open(poll_id)
//!     │
//!     ├── GET /poll/{id} ─────────────────┐  (concurrent)
//!     └── GET /user/getUserVotes?pollId ──┤
//!                                          ↓
//!                         Hydrator: seed once both arrived
//!                                          ↓
//!              set_percentage / increment / decrement (sync)
//!                                          ↓
//!              SubmitGate: loaded ∧ submittable ∧ active ∧ changed
//!                                          ↓
//! submit() ── GET /poll/{id} (re-check active)
//!          └─ POST /user/setVote | /user/editVote   (exactly one)
//!                                          ↓
//!              refetch prior vote ──→ VotingEvent::VoteSubmitted
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | No stale seeding | Hydration tickets carry a generation; old ones are dropped |
//! | No lost edits on failure | Submit never touches the allocation on error |
//! | No double submit | In-flight flag, cleared by a drop guard |
//! | No stale "active" | Poll is refetched before the write call |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Submission Gate and Prior-Vote Hydrator
//! - `ports/` - Inbound session API, outbound gateway and clock
//! - `adapters/` - In-memory backend and clocks
//! - `application/` - `VotingSession` service

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;

pub use adapters::{FixedClock, InMemoryPollApi, SystemClock};
pub use application::{SessionStatus, SubmitReceipt, VotingSession};
pub use config::SessionConfig;
pub use domain::{
    build_weight_distribution, decide_action, has_changed, GateBlocker, GateInput,
    HydrationStatus, ReseedPolicy, SubmitGate,
};
pub use error::{VotingError, VotingResult};
pub use events::VotingEvent;
pub use ports::{Clock, PollApiGateway, VotingSessionApi};
