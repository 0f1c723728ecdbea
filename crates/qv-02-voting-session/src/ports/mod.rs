//! Ports module for the voting session

pub mod inbound;
pub mod outbound;

pub use inbound::VotingSessionApi;
pub use outbound::{Clock, PollApiGateway};
