//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process user store. The HTTP gateway lives in `qv-api-client`.

mod memory;

pub use memory::InMemoryUserDirectory;
