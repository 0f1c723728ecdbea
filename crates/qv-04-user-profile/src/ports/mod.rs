//! Ports module for user profiles

pub mod outbound;

pub use outbound::UserProfileGateway;
