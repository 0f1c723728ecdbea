//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process poll store. The HTTP gateway lives in `qv-api-client`.

mod memory;

pub use memory::InMemoryPollDirectory;
