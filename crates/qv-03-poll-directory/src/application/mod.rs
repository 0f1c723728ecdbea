//! Poll directory service.

pub mod service;

pub use service::PollDirectory;
