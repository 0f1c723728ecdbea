//! # QV API Client
//!
//! `reqwest` implementation of the outbound ports of `qv-02-voting-session`
//! ([`PollApiGateway`](qv_02_voting_session::PollApiGateway)),
//! `qv-03-poll-directory`
//! ([`PollDirectoryGateway`](qv_03_poll_directory::PollDirectoryGateway)) and
//! `qv-04-user-profile`
//! ([`UserProfileGateway`](qv_04_user_profile::UserProfileGateway)).
//!
//! ## Error Mapping
//!
//! | Outcome | `GatewayError` |
//! |---------|----------------|
//! | connect failure, timeout | `Transport` |
//! | HTTP 404 | `NotFound` (`getUserVotes`: `Ok(None)`) |
//! | other non-2xx | `Http { status, message }` |
//! | body does not match | `Decode` |
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! configured.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;

pub use client::{status_error, BackendClient};
pub use config::{ClientConfig, DEFAULT_BACKEND_URL};
pub use error::{ClientError, ClientResult};
pub use gateway::{activity_page_from_response, decode_prior_vote, page_from_response};
