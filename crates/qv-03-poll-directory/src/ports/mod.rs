//! Ports module for the poll directory

pub mod outbound;

pub use outbound::PollDirectoryGateway;
