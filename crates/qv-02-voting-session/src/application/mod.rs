//! # Application Module
//!
//! Voting session service orchestrating the domain and outbound ports.

pub mod service;

pub use service::{SessionStatus, SubmitReceipt, VotingSession};
