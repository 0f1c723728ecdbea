//! # Shared Types Crate
//!
//! Poll, option and vote entities plus the backend wire payloads shared by
//! every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate types live here.
//! - **Stable Option Identity**: weight distributions are keyed by
//!   `OptionId`, never by display labels.
//! - **Lenient Wire, Strict Domain**: wire payloads tolerate missing optional
//!   fields; converted entities always satisfy their invariants.

pub mod entities;
pub mod errors;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use wire::*;
